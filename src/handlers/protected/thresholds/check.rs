// handlers/protected/thresholds/check.rs - POST /sensor-thresholds/check
//
// Any authenticated tenant role may check a reading. Breaches are written as
// alerts unless the body sets `dry_run`.

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::auth::TenantContext;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{check_reading, CheckOutcome, ReadingCheck};

pub async fn check(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    body: Result<Json<ReadingCheck>, JsonRejection>,
) -> ApiResult<CheckOutcome> {
    let Json(reading) = body?;
    let outcome = check_reading(&state.thresholds, &state.alerts, &ctx, reading).await?;
    Ok(ApiResponse::success(outcome))
}
