//! Confirmed booking endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::booking::{Booking, CancelBooking},
    scheduling::RefundResult,
};

/// Cancellation response with the refund outcome
#[derive(Serialize, ToSchema)]
pub struct CancelResponse {
    /// Cancellation status
    pub status: String,
    /// The cancelled booking
    pub booking: Booking,
    /// Refund computed from the payment's policy snapshot
    pub refund: RefundResult,
}

/// Get a booking by its reference code
#[utoipa::path(
    get,
    path = "/bookings/{reference}",
    tag = "bookings",
    params(
        ("reference" = String, Path, description = "Booking reference code")
    ),
    responses(
        (status = 200, description = "Booking", body = Booking),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    Path(reference): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = state.services.bookings.get_by_reference(&reference).await?;
    Ok(Json(booking))
}

/// Cancel a booking and compute the refund
#[utoipa::path(
    post,
    path = "/bookings/{reference}/cancel",
    tag = "bookings",
    params(
        ("reference" = String, Path, description = "Booking reference code")
    ),
    request_body = CancelBooking,
    responses(
        (status = 200, description = "Booking cancelled", body = CancelResponse),
        (status = 404, description = "Booking not found"),
        (status = 422, description = "Booking not cancellable")
    )
)]
pub async fn cancel_booking(
    State(state): State<crate::AppState>,
    Path(reference): Path<String>,
    Json(request): Json<CancelBooking>,
) -> AppResult<Json<CancelResponse>> {
    let (booking, refund) = state.services.bookings.cancel(&reference, &request).await?;

    Ok(Json(CancelResponse {
        status: "cancelled".to_string(),
        booking,
        refund,
    }))
}
