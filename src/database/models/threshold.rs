use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use uuid::Uuid;

use super::severity::Severity;
use crate::auth::TenantId;

/// Tenant-owned acceptable range for one measurement field of one sensor.
/// Either bound may be absent, meaning that side is unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub id: Uuid,
    pub tenant_id: Option<TenantId>,
    pub asset_sensor_id: Uuid,
    pub sensor_type_id: Option<Uuid>,
    pub measurement_field: String,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub severity: Severity,
    pub alert_message: Option<String>,
    pub notification_rules: Option<serde_json::Value>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Threshold {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let severity: String = row.try_get("severity")?;
        let severity = severity.parse::<Severity>().map_err(|e| sqlx::Error::ColumnDecode {
            index: "severity".to_string(),
            source: Box::new(e),
        })?;
        let tenant_id: Option<Uuid> = row.try_get("tenant_id")?;

        Ok(Self {
            id: row.try_get("id")?,
            tenant_id: tenant_id.and_then(TenantId::from_uuid),
            asset_sensor_id: row.try_get("asset_sensor_id")?,
            sensor_type_id: row.try_get("sensor_type_id")?,
            measurement_field: row.try_get("measurement_field")?,
            min_value: row.try_get("min_value")?,
            max_value: row.try_get("max_value")?,
            severity,
            alert_message: row.try_get("alert_message")?,
            notification_rules: row.try_get("notification_rules")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
