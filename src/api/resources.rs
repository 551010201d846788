//! Bookable resource endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::resource::{Resource, ResourceQuery},
};

/// List active bookable resources
#[utoipa::path(
    get,
    path = "/resources",
    tag = "resources",
    params(ResourceQuery),
    responses(
        (status = 200, description = "Active resources", body = Vec<Resource>)
    )
)]
pub async fn list_resources(
    State(state): State<crate::AppState>,
    Query(query): Query<ResourceQuery>,
) -> AppResult<Json<Vec<Resource>>> {
    let resources = state.services.availability.list_resources(query.kind).await?;
    Ok(Json(resources))
}

/// Get a resource by ID
#[utoipa::path(
    get,
    path = "/resources/{id}",
    tag = "resources",
    params(
        ("id" = i32, Path, description = "Resource ID")
    ),
    responses(
        (status = 200, description = "Resource", body = Resource),
        (status = 404, description = "Resource not found")
    )
)]
pub async fn get_resource(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Resource>> {
    let resource = state.services.availability.get_resource(id).await?;
    Ok(Json(resource))
}
