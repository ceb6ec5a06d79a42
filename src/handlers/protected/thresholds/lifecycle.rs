// handlers/protected/thresholds/lifecycle.rs - activate / deactivate without deleting

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::TenantContext;
use crate::database::models::Threshold;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /sensor-thresholds/:id/activate
pub async fn activate(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Threshold> {
    let Path(id) = path?;
    Ok(ApiResponse::success(state.thresholds.set_active(&ctx, id, true).await?))
}

/// POST /sensor-thresholds/:id/deactivate
pub async fn deactivate(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Threshold> {
    let Path(id) = path?;
    Ok(ApiResponse::success(state.thresholds.set_active(&ctx, id, false).await?))
}
