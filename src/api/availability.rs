//! Availability query endpoints
//!
//! Results are deterministic and serializable (HH:MM / ISO dates) for
//! direct surfacing to booking forms. They are advisory; the conversion
//! endpoint is where contention is finally resolved.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// Query parameters for slot availability
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SlotsQuery {
    /// Resource ID
    pub resource_id: i32,
    /// Target date (YYYY-MM-DD)
    pub date: String,
}

/// Slot availability response
#[derive(Serialize, ToSchema)]
pub struct SlotsResponse {
    pub resource_id: i32,
    pub date: String,
    /// Bookable times in chronological order (HH:MM)
    pub slots: Vec<String>,
}

/// Query parameters for date availability
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DatesQuery {
    /// Resource ID
    pub resource_id: i32,
}

/// Date availability response
#[derive(Serialize, ToSchema)]
pub struct DatesResponse {
    pub resource_id: i32,
    /// Bookable dates in chronological order (YYYY-MM-DD)
    pub dates: Vec<String>,
}

/// Bookable time slots for a resource on a date
#[utoipa::path(
    get,
    path = "/availability/slots",
    tag = "availability",
    params(SlotsQuery),
    responses(
        (status = 200, description = "Bookable slots", body = SlotsResponse),
        (status = 404, description = "Resource not found"),
        (status = 422, description = "Operating policy not configured")
    )
)]
pub async fn available_slots(
    State(state): State<crate::AppState>,
    Query(query): Query<SlotsQuery>,
) -> AppResult<Json<SlotsResponse>> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date (use YYYY-MM-DD)".to_string()))?;

    let slots = state
        .services
        .availability
        .available_slots(query.resource_id, date)
        .await?;

    Ok(Json(SlotsResponse {
        resource_id: query.resource_id,
        date: query.date,
        slots,
    }))
}

/// Bookable dates for a resource up to its target date
#[utoipa::path(
    get,
    path = "/availability/dates",
    tag = "availability",
    params(DatesQuery),
    responses(
        (status = 200, description = "Bookable dates", body = DatesResponse),
        (status = 404, description = "Resource not found"),
        (status = 422, description = "Operating policy not configured")
    )
)]
pub async fn available_dates(
    State(state): State<crate::AppState>,
    Query(query): Query<DatesQuery>,
) -> AppResult<Json<DatesResponse>> {
    let dates = state
        .services
        .availability
        .available_dates(query.resource_id)
        .await?;

    Ok(Json(DatesResponse {
        resource_id: query.resource_id,
        dates,
    }))
}
