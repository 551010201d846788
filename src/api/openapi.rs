//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{availability, bookings, drafts, health, payments, resources, settings};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Forecourt API",
        version = "1.0.0",
        description = "Dealership Booking System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Forecourt Team", email = "contact@forecourt.example")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Resources
        resources::list_resources,
        resources::get_resource,
        // Availability
        availability::available_slots,
        availability::available_dates,
        // Drafts
        drafts::start_draft,
        drafts::get_draft,
        drafts::set_schedule,
        drafts::set_details,
        drafts::set_add_ons,
        drafts::set_payment_choice,
        drafts::convert_draft,
        // Payments
        payments::record_payment,
        payments::get_payment,
        // Bookings
        bookings::get_booking,
        bookings::cancel_booking,
        // Settings
        settings::get_policy,
        settings::update_policy,
        settings::list_blocked_ranges,
        settings::create_blocked_range,
        settings::delete_blocked_range,
    ),
    components(
        schemas(
            // Resources
            crate::models::resource::Resource,
            crate::models::resource::ResourceQuery,
            crate::models::enums::BookingKind,
            // Availability
            availability::SlotsQuery,
            availability::SlotsResponse,
            availability::DatesQuery,
            availability::DatesResponse,
            // Drafts
            crate::models::draft::DraftBooking,
            crate::models::draft::AddOn,
            crate::models::draft::StartDraft,
            crate::models::draft::ScheduleStep,
            crate::models::draft::DetailsStep,
            crate::models::draft::AddOnsStep,
            crate::models::draft::PaymentStep,
            // Bookings
            crate::models::booking::Booking,
            crate::models::booking::ConvertDraft,
            crate::models::booking::CancelBooking,
            crate::models::enums::BookingStatus,
            crate::models::enums::PaymentStatus,
            crate::models::enums::PaymentMethod,
            bookings::CancelResponse,
            crate::scheduling::RefundResult,
            crate::scheduling::refund::RefundTier,
            // Payments
            crate::models::payment::Payment,
            crate::models::payment::CreatePayment,
            // Settings
            crate::models::policy::OperatingPolicy,
            crate::models::policy::UpdatePolicyRequest,
            crate::models::policy::BlockedRange,
            crate::models::policy::CreateBlockedRange,
            crate::models::enums::DepositMode,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "resources", description = "Bookable resources"),
        (name = "availability", description = "Slot and date availability"),
        (name = "drafts", description = "Multi-step draft booking flow"),
        (name = "payments", description = "Payment records"),
        (name = "bookings", description = "Confirmed bookings"),
        (name = "settings", description = "Operating policy and blocked ranges")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
