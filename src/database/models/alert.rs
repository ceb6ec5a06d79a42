use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use std::str::FromStr;
use uuid::Uuid;

use super::severity::Severity;
use crate::auth::TenantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    ThresholdBelowMin,
    ThresholdAboveMax,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::ThresholdBelowMin => "threshold_below_min",
            AlertType::ThresholdAboveMax => "threshold_above_max",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown alert type '{0}'")]
pub struct InvalidAlertType(pub String);

impl FromStr for AlertType {
    type Err = InvalidAlertType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "threshold_below_min" => Ok(AlertType::ThresholdBelowMin),
            "threshold_above_max" => Ok(AlertType::ThresholdAboveMax),
            other => Err(InvalidAlertType(other.to_string())),
        }
    }
}

/// Persisted breach record. Open while `is_resolved == false`; resolution is terminal.
///
/// `threshold_id` becomes `None` if the producing threshold is later hard-deleted;
/// the bounds in force at breach time are kept on the alert itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub tenant_id: Option<TenantId>,
    pub asset_id: Uuid,
    pub asset_sensor_id: Uuid,
    pub threshold_id: Option<Uuid>,
    pub measurement_field_name: String,
    pub alert_time: DateTime<Utc>,
    pub resolved_time: Option<DateTime<Utc>>,
    pub severity: Severity,
    pub trigger_value: f64,
    pub threshold_min_value: Option<f64>,
    pub threshold_max_value: Option<f64>,
    pub alert_message: String,
    pub alert_type: AlertType,
    pub is_resolved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Alert {
    /// Open -> Resolved. Returns false (and changes nothing) if already resolved.
    pub fn mark_resolved(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_resolved {
            return false;
        }
        self.is_resolved = true;
        self.resolved_time = Some(at);
        self.updated_at = at;
        true
    }
}

impl<'r> FromRow<'r, PgRow> for Alert {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let severity: String = row.try_get("severity")?;
        let severity = severity.parse::<Severity>().map_err(|e| sqlx::Error::ColumnDecode {
            index: "severity".to_string(),
            source: Box::new(e),
        })?;
        let alert_type: String = row.try_get("alert_type")?;
        let alert_type = alert_type.parse::<AlertType>().map_err(|e| sqlx::Error::ColumnDecode {
            index: "alert_type".to_string(),
            source: Box::new(e),
        })?;
        let tenant_id: Option<Uuid> = row.try_get("tenant_id")?;

        Ok(Self {
            id: row.try_get("id")?,
            tenant_id: tenant_id.and_then(TenantId::from_uuid),
            asset_id: row.try_get("asset_id")?,
            asset_sensor_id: row.try_get("asset_sensor_id")?,
            threshold_id: row.try_get("threshold_id")?,
            measurement_field_name: row.try_get("measurement_field_name")?,
            alert_time: row.try_get("alert_time")?,
            resolved_time: row.try_get("resolved_time")?,
            severity,
            trigger_value: row.try_get("trigger_value")?,
            threshold_min_value: row.try_get("threshold_min_value")?,
            threshold_max_value: row.try_get("threshold_max_value")?,
            alert_message: row.try_get("alert_message")?,
            alert_type,
            is_resolved: row.try_get("is_resolved")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Aggregate counts over the alerts visible in one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertStatistics {
    pub total: i64,
    pub active: i64,
    pub resolved: i64,
    pub critical: i64,
    pub warning: i64,
    pub last_24h: i64,
    pub last_7d: i64,
}

impl<'r> FromRow<'r, PgRow> for AlertStatistics {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            total: row.try_get("total")?,
            active: row.try_get("active")?,
            resolved: row.try_get("resolved")?,
            critical: row.try_get("critical")?,
            warning: row.try_get("warning")?,
            last_24h: row.try_get("last_24h")?,
            last_7d: row.try_get("last_7d")?,
        })
    }
}
