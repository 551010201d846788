//! Draft booking flow endpoints
//!
//! One endpoint per flow step. The draft is addressed by its opaque
//! session token; there is no cross-session sharing.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::booking::{Booking, ConvertDraft},
    models::draft::{AddOnsStep, DetailsStep, DraftBooking, PaymentStep, ScheduleStep, StartDraft},
};

/// Start a draft booking
#[utoipa::path(
    post,
    path = "/drafts",
    tag = "drafts",
    request_body = StartDraft,
    responses(
        (status = 201, description = "Draft created", body = DraftBooking),
        (status = 404, description = "Resource not found"),
        (status = 422, description = "Resource not bookable")
    )
)]
pub async fn start_draft(
    State(state): State<crate::AppState>,
    Json(request): Json<StartDraft>,
) -> AppResult<(StatusCode, Json<DraftBooking>)> {
    let draft = state.services.drafts.start(&request).await?;
    Ok((StatusCode::CREATED, Json(draft)))
}

/// Get a draft booking
#[utoipa::path(
    get,
    path = "/drafts/{token}",
    tag = "drafts",
    params(
        ("token" = Uuid, Path, description = "Draft session token")
    ),
    responses(
        (status = 200, description = "Draft booking", body = DraftBooking),
        (status = 404, description = "Draft not found"),
        (status = 410, description = "Draft expired")
    )
)]
pub async fn get_draft(
    State(state): State<crate::AppState>,
    Path(token): Path<Uuid>,
) -> AppResult<Json<DraftBooking>> {
    let draft = state.services.drafts.get(token).await?;
    Ok(Json(draft))
}

/// Select the date and time
#[utoipa::path(
    put,
    path = "/drafts/{token}/schedule",
    tag = "drafts",
    params(
        ("token" = Uuid, Path, description = "Draft session token")
    ),
    request_body = ScheduleStep,
    responses(
        (status = 200, description = "Schedule recorded", body = DraftBooking),
        (status = 404, description = "Draft not found"),
        (status = 409, description = "Slot not available"),
        (status = 410, description = "Draft expired")
    )
)]
pub async fn set_schedule(
    State(state): State<crate::AppState>,
    Path(token): Path<Uuid>,
    Json(request): Json<ScheduleStep>,
) -> AppResult<Json<DraftBooking>> {
    let draft = state.services.drafts.set_schedule(token, &request).await?;
    Ok(Json(draft))
}

/// Record customer details
#[utoipa::path(
    put,
    path = "/drafts/{token}/details",
    tag = "drafts",
    params(
        ("token" = Uuid, Path, description = "Draft session token")
    ),
    request_body = DetailsStep,
    responses(
        (status = 200, description = "Details recorded", body = DraftBooking),
        (status = 400, description = "Invalid details"),
        (status = 404, description = "Draft not found"),
        (status = 410, description = "Draft expired")
    )
)]
pub async fn set_details(
    State(state): State<crate::AppState>,
    Path(token): Path<Uuid>,
    Json(request): Json<DetailsStep>,
) -> AppResult<Json<DraftBooking>> {
    let draft = state.services.drafts.set_details(token, &request).await?;
    Ok(Json(draft))
}

/// Select add-ons; the total and deposit are recomputed
#[utoipa::path(
    put,
    path = "/drafts/{token}/add-ons",
    tag = "drafts",
    params(
        ("token" = Uuid, Path, description = "Draft session token")
    ),
    request_body = AddOnsStep,
    responses(
        (status = 200, description = "Add-ons recorded", body = DraftBooking),
        (status = 404, description = "Draft not found"),
        (status = 410, description = "Draft expired")
    )
)]
pub async fn set_add_ons(
    State(state): State<crate::AppState>,
    Path(token): Path<Uuid>,
    Json(request): Json<AddOnsStep>,
) -> AppResult<Json<DraftBooking>> {
    let draft = state.services.drafts.set_add_ons(token, &request).await?;
    Ok(Json(draft))
}

/// Choose the payment method and accept the terms
#[utoipa::path(
    put,
    path = "/drafts/{token}/payment",
    tag = "drafts",
    params(
        ("token" = Uuid, Path, description = "Draft session token")
    ),
    request_body = PaymentStep,
    responses(
        (status = 200, description = "Payment choice recorded", body = DraftBooking),
        (status = 404, description = "Draft not found"),
        (status = 410, description = "Draft expired")
    )
)]
pub async fn set_payment_choice(
    State(state): State<crate::AppState>,
    Path(token): Path<Uuid>,
    Json(request): Json<PaymentStep>,
) -> AppResult<Json<DraftBooking>> {
    let draft = state
        .services
        .drafts
        .set_payment_choice(token, &request)
        .await?;
    Ok(Json(draft))
}

/// Convert the draft into a confirmed booking
#[utoipa::path(
    post,
    path = "/drafts/{token}/convert",
    tag = "drafts",
    params(
        ("token" = Uuid, Path, description = "Draft session token")
    ),
    request_body = ConvertDraft,
    responses(
        (status = 201, description = "Booking confirmed", body = Booking),
        (status = 404, description = "Draft not found (already converted?)"),
        (status = 409, description = "Slot no longer available"),
        (status = 410, description = "Draft expired"),
        (status = 422, description = "Draft incomplete")
    )
)]
pub async fn convert_draft(
    State(state): State<crate::AppState>,
    Path(token): Path<Uuid>,
    Json(request): Json<ConvertDraft>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let booking = state.services.bookings.convert(token, &request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}
