// handlers/protected/alerts/resolve.rs - single-alert lifecycle changes

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::TenantContext;
use crate::database::models::Alert;
use crate::middleware::{ApiResponse, ApiResult};

/// PATCH /asset-alerts/:id/resolve - idempotent
pub async fn resolve(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Alert> {
    let Path(id) = path?;
    Ok(ApiResponse::success(state.alerts.resolve(&ctx, id).await?))
}

/// DELETE /asset-alerts/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;
    state.alerts.delete(&ctx, id).await?;
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}
