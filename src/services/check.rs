//! Reading check: catalog lookup, evaluation, and alert creation in one call.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::alert_service::{AlertService, SensorRef};
use super::error::{ServiceError, ServiceResult};
use super::evaluator::{self, BreachResult};
use super::threshold_service::ThresholdService;
use crate::auth::TenantContext;

#[derive(Debug, Clone, Deserialize)]
pub struct ReadingCheck {
    pub asset_id: Uuid,
    pub asset_sensor_id: Uuid,
    pub measurement_field: String,
    pub value: f64,
    /// Evaluate without persisting alerts.
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub asset_sensor_id: Uuid,
    pub measurement_field: String,
    pub value: f64,
    pub evaluated_thresholds: usize,
    pub breaches: Vec<BreachResult>,
    pub alert_ids: Vec<Uuid>,
}

pub async fn check_reading(
    thresholds: &ThresholdService,
    alerts: &AlertService,
    ctx: &TenantContext,
    reading: ReadingCheck,
) -> ServiceResult<CheckOutcome> {
    if !reading.value.is_finite() {
        return Err(ServiceError::validation("value", "value must be a finite number"));
    }
    let field = reading.measurement_field.trim();
    if field.is_empty() {
        return Err(ServiceError::validation("measurement_field", "measurement_field must not be empty"));
    }

    let catalog = thresholds.for_sensor(ctx, reading.asset_sensor_id, field).await?;
    let evaluated = catalog.iter().filter(|t| evaluator::applicable(t, field)).count();
    let breaches = evaluator::evaluate(field, reading.value, &catalog);

    tracing::debug!(
        sensor = %reading.asset_sensor_id,
        field,
        value = reading.value,
        evaluated,
        breached = breaches.len(),
        "reading evaluated"
    );

    let mut alert_ids = Vec::with_capacity(breaches.len());
    if !reading.dry_run {
        let sensor = SensorRef {
            asset_id: reading.asset_id,
            asset_sensor_id: reading.asset_sensor_id,
        };
        for breach in &breaches {
            let alert = alerts.create_from_breach(ctx, breach, sensor).await?;
            alert_ids.push(alert.id);
        }
    }

    Ok(CheckOutcome {
        asset_sensor_id: reading.asset_sensor_id,
        measurement_field: field.to_string(),
        value: reading.value,
        evaluated_thresholds: evaluated,
        breaches,
        alert_ids,
    })
}
