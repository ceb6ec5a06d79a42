// handlers/elevated/superadmin/alerts.rs - cross-tenant alert access

use axum::{
    extract::{rejection::{JsonRejection, PathRejection, QueryRejection}, Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::TenantContext;
use crate::database::models::{Alert, AlertStatistics};
use crate::handlers::params::{AlertListQuery, BulkIdsRequest, TenantQuery};
use crate::handlers::protected::alerts::{BulkDeleteSummary, BulkResolveSummary};
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::Page;

/// GET /superadmin/asset-alerts
pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    query: Result<Query<AlertListQuery>, QueryRejection>,
    tenant: Result<Query<TenantQuery>, QueryRejection>,
) -> ApiResult<Page<Alert>> {
    let Query(query) = query?;
    let tenant = tenant?.tenant()?;
    let filter = query.filter()?;
    let page = query.page(&state.config.api);
    Ok(ApiResponse::success(state.alerts.list_global(&ctx, tenant, &filter, page).await?))
}

/// GET /superadmin/asset-alerts/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Alert> {
    let Path(id) = path?;
    Ok(ApiResponse::success(state.alerts.get(&ctx, id).await?))
}

/// PATCH /superadmin/asset-alerts/:id/resolve
pub async fn resolve(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Alert> {
    let Path(id) = path?;
    Ok(ApiResponse::success(state.alerts.resolve(&ctx, id).await?))
}

/// PATCH /superadmin/asset-alerts/resolve-multiple
pub async fn resolve_multiple(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    body: Result<Json<BulkIdsRequest>, JsonRejection>,
) -> ApiResult<BulkResolveSummary> {
    let Json(request) = body?;
    let ids = request.validated(state.config.api.max_bulk_ids)?;
    let batch = state.alerts.bulk_resolve(&ctx, &ids).await?;
    Ok(ApiResponse::success(BulkResolveSummary::with_failed_ids(&batch)))
}

/// DELETE /superadmin/asset-alerts/delete-multiple
pub async fn delete_multiple(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    body: Result<Json<BulkIdsRequest>, JsonRejection>,
) -> ApiResult<BulkDeleteSummary> {
    let Json(request) = body?;
    let ids = request.validated(state.config.api.max_bulk_ids)?;
    let batch = state.alerts.bulk_delete(&ctx, &ids).await?;
    Ok(ApiResponse::success(BulkDeleteSummary::with_failed_ids(&batch)))
}

/// GET /superadmin/asset-alerts/statistics
pub async fn statistics(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    query: Result<Query<TenantQuery>, QueryRejection>,
) -> ApiResult<AlertStatistics> {
    let Query(query) = query?;
    let tenant = query.tenant()?;
    Ok(ApiResponse::success(state.alerts.statistics_global(&ctx, tenant).await?))
}
