// handlers/protected/alerts/bulk.rs - best-effort batch endpoints
//
// Counts are always returned so partial failure is visible on a 200.

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::TenantContext;
use crate::handlers::params::BulkIdsRequest;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::BatchResult;

/// Tenant callers get counts only; the superadmin mirror also lists `failed_ids`.
#[derive(Debug, Serialize)]
pub struct BulkResolveSummary {
    pub resolved_count: usize,
    pub failed_count: usize,
    pub total_requested: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_ids: Option<Vec<Uuid>>,
}

impl BulkResolveSummary {
    pub fn from_batch<T>(batch: &BatchResult<T>) -> Self {
        Self {
            resolved_count: batch.succeeded.len(),
            failed_count: batch.failed.len(),
            total_requested: batch.total_requested(),
            failed_ids: None,
        }
    }

    pub fn with_failed_ids<T>(batch: &BatchResult<T>) -> Self {
        Self {
            failed_ids: Some(batch.failed_ids()),
            ..Self::from_batch(batch)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteSummary {
    pub deleted_count: usize,
    pub failed_count: usize,
    pub total_requested: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_ids: Option<Vec<Uuid>>,
}

impl BulkDeleteSummary {
    pub fn from_batch<T>(batch: &BatchResult<T>) -> Self {
        Self {
            deleted_count: batch.succeeded.len(),
            failed_count: batch.failed.len(),
            total_requested: batch.total_requested(),
            failed_ids: None,
        }
    }

    pub fn with_failed_ids<T>(batch: &BatchResult<T>) -> Self {
        Self {
            failed_ids: Some(batch.failed_ids()),
            ..Self::from_batch(batch)
        }
    }
}

/// PATCH /asset-alerts/resolve-multiple
pub async fn resolve_multiple(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    body: Result<Json<BulkIdsRequest>, JsonRejection>,
) -> ApiResult<BulkResolveSummary> {
    let Json(request) = body?;
    let ids = request.validated(state.config.api.max_bulk_ids)?;
    let batch = state.alerts.bulk_resolve(&ctx, &ids).await?;

    Ok(ApiResponse::success(BulkResolveSummary::from_batch(&batch)))
}

/// DELETE /asset-alerts/delete-multiple
pub async fn delete_multiple(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    body: Result<Json<BulkIdsRequest>, JsonRejection>,
) -> ApiResult<BulkDeleteSummary> {
    let Json(request) = body?;
    let ids = request.validated(state.config.api.max_bulk_ids)?;
    let batch = state.alerts.bulk_delete(&ctx, &ids).await?;

    Ok(ApiResponse::success(BulkDeleteSummary::from_batch(&batch)))
}
