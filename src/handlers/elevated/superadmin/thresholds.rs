// handlers/elevated/superadmin/thresholds.rs - cross-tenant threshold access

use axum::{
    extract::{rejection::{JsonRejection, PathRejection, QueryRejection}, Path, Query, State},
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::TenantContext;
use crate::database::models::Threshold;
use crate::handlers::params::{TenantQuery, ThresholdListQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UpdateThreshold;
use crate::types::Page;

/// GET /superadmin/sensor-thresholds - all tenants unless `tenant_id` is given
pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    query: Result<Query<ThresholdListQuery>, QueryRejection>,
    tenant: Result<Query<TenantQuery>, QueryRejection>,
) -> ApiResult<Page<Threshold>> {
    let Query(query) = query?;
    let tenant = tenant?.tenant()?;
    let page = query.page(&state.config.api);
    let thresholds = state.thresholds.list_all(&ctx, tenant, &query.filter(), page).await?;
    Ok(ApiResponse::success(thresholds))
}

/// GET /superadmin/sensor-thresholds/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Threshold> {
    let Path(id) = path?;
    Ok(ApiResponse::success(state.thresholds.get(&ctx, id).await?))
}

/// PUT /superadmin/sensor-thresholds/:id
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

/// DELETE /superadmin/sensor-thresholds/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;
    state.thresholds.delete(&ctx, id).await?;
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}
