// handlers/protected/thresholds/crud.rs - /sensor-thresholds create, read, update, delete

use axum::{
    extract::{rejection::{JsonRejection, PathRejection, QueryRejection}, Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::TenantContext;
use crate::database::models::Threshold;
use crate::handlers::params::{TenantQuery, ThresholdListQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{CreateThreshold, UpdateThreshold};
use crate::types::Page;

/// POST /sensor-thresholds - admin/manager only
pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    body: Result<Json<CreateThreshold>, JsonRejection>,
) -> ApiResult<Threshold> {
    let Json(input) = body?;
    let threshold = state.thresholds.create(&ctx, input).await?;
    Ok(ApiResponse::created(threshold))
}

/// GET /sensor-thresholds/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Threshold> {
    let Path(id) = path?;
    Ok(ApiResponse::success(state.thresholds.get(&ctx, id).await?))
}

/// GET /sensor-thresholds - paginated, filterable by sensor, sensor type, field, severity, is_active
pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    query: Result<Query<ThresholdListQuery>, QueryRejection>,
    tenant: Result<Query<TenantQuery>, QueryRejection>,
) -> ApiResult<Page<Threshold>> {
    let Query(query) = query?;
    tenant?.reject()?;
    let page = query.page(&state.config.api);
    Ok(ApiResponse::success(state.thresholds.list(&ctx, &query.filter(), page).await?))
}

/// PUT /sensor-thresholds/:id - partial update, admin/manager only
pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateThreshold>, JsonRejection>,
) -> ApiResult<Threshold> {
    let Path(id) = path?;
    let Json(patch) = body?;
    Ok(ApiResponse::success(state.thresholds.update(&ctx, id, patch).await?))
}

/// DELETE /sensor-thresholds/:id - admin/manager only
pub async fn delete(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<serde_json::Value> {
    let Path(id) = path?;
    state.thresholds.delete(&ctx, id).await?;
    Ok(ApiResponse::success(serde_json::json!({ "id": id, "deleted": true })))
}
