//! Settings endpoints: operating policy and blocked ranges

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::policy::{
        BlockedRange, BlockedRangeQuery, CreateBlockedRange, OperatingPolicy, UpdatePolicyRequest,
    },
};

/// Get the operating policy
#[utoipa::path(
    get,
    path = "/settings/policy",
    tag = "settings",
    responses(
        (status = 200, description = "Operating policy", body = OperatingPolicy),
        (status = 404, description = "No policy configured")
    )
)]
pub async fn get_policy(
    State(state): State<crate::AppState>,
) -> AppResult<Json<OperatingPolicy>> {
    let policy = state.services.settings.get_policy().await?;
    Ok(Json(policy))
}

/// Update the operating policy
#[utoipa::path(
    put,
    path = "/settings/policy",
    tag = "settings",
    request_body = UpdatePolicyRequest,
    responses(
        (status = 200, description = "Policy updated", body = OperatingPolicy),
        (status = 400, description = "Invalid policy configuration")
    )
)]
pub async fn update_policy(
    State(state): State<crate::AppState>,
    Json(request): Json<UpdatePolicyRequest>,
) -> AppResult<Json<OperatingPolicy>> {
    let policy = state.services.settings.update_policy(&request).await?;
    Ok(Json(policy))
}

/// List blocked ranges
#[utoipa::path(
    get,
    path = "/settings/blocked-ranges",
    tag = "settings",
    params(BlockedRangeQuery),
    responses(
        (status = 200, description = "Blocked ranges", body = Vec<BlockedRange>)
    )
)]
pub async fn list_blocked_ranges(
    State(state): State<crate::AppState>,
    Query(query): Query<BlockedRangeQuery>,
) -> AppResult<Json<Vec<BlockedRange>>> {
    let start = parse_optional_date(query.start_date.as_deref(), "start_date")?;
    let end = parse_optional_date(query.end_date.as_deref(), "end_date")?;

    let ranges = state.services.settings.list_blocked_ranges(start, end).await?;
    Ok(Json(ranges))
}

/// Create a blocked range
#[utoipa::path(
    post,
    path = "/settings/blocked-ranges",
    tag = "settings",
    request_body = CreateBlockedRange,
    responses(
        (status = 201, description = "Blocked range created", body = BlockedRange),
        (status = 400, description = "Invalid range")
    )
)]
pub async fn create_blocked_range(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBlockedRange>,
) -> AppResult<(StatusCode, Json<BlockedRange>)> {
    let range = state.services.settings.create_blocked_range(&request).await?;
    Ok((StatusCode::CREATED, Json(range)))
}

/// Delete a blocked range
#[utoipa::path(
    delete,
    path = "/settings/blocked-ranges/{id}",
    tag = "settings",
    params(
        ("id" = i32, Path, description = "Blocked range ID")
    ),
    responses(
        (status = 204, description = "Blocked range deleted"),
        (status = 404, description = "Blocked range not found")
    )
)]
pub async fn delete_blocked_range(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.settings.delete_blocked_range(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_optional_date(value: Option<&str>, field: &str) -> AppResult<Option<NaiveDate>> {
    match value {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::Validation(format!("Invalid {} (use YYYY-MM-DD)", field))),
        None => Ok(None),
    }
}
