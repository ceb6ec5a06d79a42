// handlers/protected/alerts/query.rs - tenant-scoped alert reads

use axum::{
    extract::{rejection::{PathRejection, QueryRejection}, Path, Query, State},
    Extension,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::TenantContext;
use crate::database::models::{Alert, AlertStatistics};
use crate::handlers::params::{AlertListQuery, PageQuery, TenantQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::Page;

/// GET /asset-alerts - filters: asset, sensor, threshold, severity, resolved, from/to
pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    query: Result<Query<AlertListQuery>, QueryRejection>,
    tenant: Result<Query<TenantQuery>, QueryRejection>,
) -> ApiResult<Page<Alert>> {
    let Query(query) = query?;
    tenant?.reject()?;
    let filter = query.filter()?;
    let page = query.page(&state.config.api);
    Ok(ApiResponse::success(state.alerts.list(&ctx, &filter, page).await?))
}

/// GET /asset-alerts/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Alert> {
    let Path(id) = path?;
    Ok(ApiResponse::success(state.alerts.get(&ctx, id).await?))
}

/// GET /asset-alerts/asset/:asset_id
pub async fn by_asset(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Page<Alert>> {
    let Path(asset_id) = path?;
    let Query(query) = query?;
    let page = query.alert_page(&state.config.api);
    Ok(ApiResponse::success(state.alerts.list_by_asset(&ctx, asset_id, page).await?))
}

/// GET /asset-alerts/sensor/:asset_sensor_id
pub async fn by_sensor(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Page<Alert>> {
    let Path(sensor_id) = path?;
    let Query(query) = query?;
    let page = query.alert_page(&state.config.api);
    Ok(ApiResponse::success(state.alerts.list_by_sensor(&ctx, sensor_id, page).await?))
}

/// GET /asset-alerts/active
pub async fn active(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Page<Alert>> {
    let Query(query) = query?;
    let page = query.alert_page(&state.config.api);
    Ok(ApiResponse::success(state.alerts.list_active(&ctx, page).await?))
}

/// GET /asset-alerts/statistics
pub async fn statistics(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    tenant: Result<Query<TenantQuery>, QueryRejection>,
) -> ApiResult<AlertStatistics> {
    tenant?.reject()?;
    Ok(ApiResponse::success(state.alerts.statistics(&ctx).await?))
}
