//! Payment record endpoints
//!
//! Payments arrive here with their facts already resolved by the external
//! checkout/webhook flow.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::payment::{CreatePayment, Payment},
};

/// Record a payment against a draft
#[utoipa::path(
    post,
    path = "/drafts/{token}/payments",
    tag = "payments",
    params(
        ("token" = Uuid, Path, description = "Draft session token")
    ),
    request_body = CreatePayment,
    responses(
        (status = 201, description = "Payment recorded", body = Payment),
        (status = 404, description = "Draft not found"),
        (status = 409, description = "External reference already recorded"),
        (status = 410, description = "Draft expired")
    )
)]
pub async fn record_payment(
    State(state): State<crate::AppState>,
    Path(token): Path<Uuid>,
    Json(request): Json<CreatePayment>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    let payment = state
        .services
        .payments
        .record_for_draft(token, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// Get a payment by ID
#[utoipa::path(
    get,
    path = "/payments/{id}",
    tag = "payments",
    params(
        ("id" = i32, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Payment", body = Payment),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn get_payment(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Payment>> {
    let payment = state.services.payments.get(id).await?;
    Ok(Json(payment))
}
