//! Threshold Evaluator: pure breach decisions, no I/O.
//!
//! The safe range of a threshold is the closed interval `[min, max]`; a value
//! sitting exactly on a bound is never a breach. An absent bound is unbounded
//! on that side.

use serde::Serialize;
use uuid::Uuid;

use crate::auth::TenantId;
use crate::database::models::{AlertType, Severity, Threshold};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreachDirection {
    BelowMin,
    AboveMax,
}

impl BreachDirection {
    pub fn alert_type(self) -> AlertType {
        match self {
            BreachDirection::BelowMin => AlertType::ThresholdBelowMin,
            BreachDirection::AboveMax => AlertType::ThresholdAboveMax,
        }
    }
}

/// One breached threshold, with everything needed to write an alert
/// without reloading the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreachResult {
    pub threshold_id: Uuid,
    pub tenant_id: Option<TenantId>,
    pub measurement_field: String,
    pub is_breached: bool,
    pub value: f64,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub severity: Severity,
    pub direction: BreachDirection,
    pub message: String,
}

pub fn breach_direction(value: f64, min: Option<f64>, max: Option<f64>) -> Option<BreachDirection> {
    if min.map_or(false, |min| value < min) {
        Some(BreachDirection::BelowMin)
    } else if max.map_or(false, |max| value > max) {
        Some(BreachDirection::AboveMax)
    } else {
        None
    }
}

/// Whether a threshold takes part in evaluating `field`.
pub fn applicable(threshold: &Threshold, field: &str) -> bool {
    threshold.is_active && threshold.measurement_field == field
}

/// Evaluate `value` against every applicable threshold independently.
///
/// Overlapping bands (say a warning and a critical range on the same field)
/// each yield their own result. No applicable threshold yields an empty vec.
pub fn evaluate(field: &str, value: f64, thresholds: &[Threshold]) -> Vec<BreachResult> {
    thresholds
        .iter()
        .filter(|t| applicable(t, field))
        .filter_map(|t| {
            let direction = breach_direction(value, t.min_value, t.max_value)?;
            Some(BreachResult {
                threshold_id: t.id,
                tenant_id: t.tenant_id,
                measurement_field: t.measurement_field.clone(),
                is_breached: true,
                value,
                min_value: t.min_value,
                max_value: t.max_value,
                severity: t.severity,
                direction,
                message: breach_message(t, value, direction),
            })
        })
        .collect()
}

fn breach_message(threshold: &Threshold, value: f64, direction: BreachDirection) -> String {
    if let Some(custom) = threshold.alert_message.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        return custom.to_string();
    }
    match (direction, threshold.min_value, threshold.max_value) {
        (BreachDirection::BelowMin, Some(min), _) => format!(
            "{} value {} is below minimum threshold {}",
            threshold.measurement_field, value, min
        ),
        (BreachDirection::AboveMax, _, Some(max)) => format!(
            "{} value {} is above maximum threshold {}",
            threshold.measurement_field, value, max
        ),
        _ => format!("{} value {} is out of range", threshold.measurement_field, value),
    }
}
