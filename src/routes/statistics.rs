use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    dto::statistics::{AdminStatistics, RestaurantStatistics},
    error::AppResult,
    response::ApiResponse,
    services::statistics_service,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/admin/statistics",
    responses(
        (status = 200, description = "Platform-wide totals (admin only)", body = ApiResponse<AdminStatistics>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn admin_statistics(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<AdminStatistics>>> {
    let resp = statistics_service::admin_statistics(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/{id}/statistics",
    params(
        ("id" = Uuid, Path, description = "Restaurant ID")
    ),
    responses(
        (status = 200, description = "Totals for one restaurant", body = ApiResponse<RestaurantStatistics>),
        (status = 404, description = "Restaurant not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn restaurant_statistics(
    State(state): State<AppState>,
    Path(restaurant_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RestaurantStatistics>>> {
    let resp = statistics_service::restaurant_statistics(&state, restaurant_id).await?;
    Ok(Json(resp))
}
