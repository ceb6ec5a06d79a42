//! Storage traits for thresholds and alerts.
//!
//! Every call carries an explicit [`TenantScope`]; implementations must never
//! return or touch a row outside that scope.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::TenantScope;
use crate::database::manager::DatabaseError;
use crate::database::models::{Alert, AlertStatistics, Severity, Threshold};
use crate::types::{Page, PageParams};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ThresholdFilter {
    pub asset_sensor_id: Option<Uuid>,
    pub sensor_type_id: Option<Uuid>,
    pub measurement_field: Option<String>,
    pub severity: Option<Severity>,
    pub is_active: Option<bool>,
}

impl ThresholdFilter {
    pub fn matches(&self, t: &Threshold) -> bool {
        self.asset_sensor_id.map_or(true, |v| t.asset_sensor_id == v)
            && self.sensor_type_id.map_or(true, |v| t.sensor_type_id == Some(v))
            && self.measurement_field.as_deref().map_or(true, |v| t.measurement_field == v)
            && self.severity.map_or(true, |v| t.severity == v)
            && self.is_active.map_or(true, |v| t.is_active == v)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AlertFilter {
    pub asset_id: Option<Uuid>,
    pub asset_sensor_id: Option<Uuid>,
    pub threshold_id: Option<Uuid>,
    pub severity: Option<Severity>,
    pub is_resolved: Option<bool>,
    /// Inclusive lower bound on `alert_time`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `alert_time`.
    pub to: Option<DateTime<Utc>>,
}

impl AlertFilter {
    pub fn matches(&self, a: &Alert) -> bool {
        self.asset_id.map_or(true, |v| a.asset_id == v)
            && self.asset_sensor_id.map_or(true, |v| a.asset_sensor_id == v)
            && self.threshold_id.map_or(true, |v| a.threshold_id == Some(v))
            && self.severity.map_or(true, |v| a.severity == v)
            && self.is_resolved.map_or(true, |v| a.is_resolved == v)
            && self.from.map_or(true, |v| a.alert_time >= v)
            && self.to.map_or(true, |v| a.alert_time <= v)
    }
}

#[async_trait]
pub trait ThresholdRepository: Send + Sync {
    async fn insert_threshold(&self, threshold: &Threshold) -> Result<(), DatabaseError>;

    async fn find_threshold(&self, scope: TenantScope, id: Uuid) -> Result<Option<Threshold>, DatabaseError>;

    /// Ordered newest first.
    async fn list_thresholds(
        &self,
        scope: TenantScope,
        filter: &ThresholdFilter,
        page: PageParams,
    ) -> Result<Page<Threshold>, DatabaseError>;

    /// Full overwrite of a stored threshold. Returns false if no row in scope matched.
    async fn update_threshold(&self, scope: TenantScope, threshold: &Threshold) -> Result<bool, DatabaseError>;

    async fn delete_threshold(&self, scope: TenantScope, id: Uuid) -> Result<bool, DatabaseError>;

    /// Every threshold (active or not) configured for a sensor field.
    async fn thresholds_for_sensor(
        &self,
        scope: TenantScope,
        asset_sensor_id: Uuid,
        measurement_field: &str,
    ) -> Result<Vec<Threshold>, DatabaseError>;
}

#[async_trait]
pub trait AlertRepository: Send + Sync {
    async fn insert_alert(&self, alert: &Alert) -> Result<(), DatabaseError>;

    async fn find_alert(&self, scope: TenantScope, id: Uuid) -> Result<Option<Alert>, DatabaseError>;

    /// Ordered by `alert_time`, newest first.
    async fn list_alerts(
        &self,
        scope: TenantScope,
        filter: &AlertFilter,
        page: PageParams,
    ) -> Result<Page<Alert>, DatabaseError>;

    /// Resolve an open alert at `at`. An already-resolved alert is returned
    /// unchanged. `None` means no alert with that id exists in scope.
    async fn resolve_alert(
        &self,
        scope: TenantScope,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Alert>, DatabaseError>;

    async fn delete_alert(&self, scope: TenantScope, id: Uuid) -> Result<bool, DatabaseError>;

    /// Counts over the scope; time windows are measured back from `now`.
    async fn alert_statistics(&self, scope: TenantScope, now: DateTime<Utc>) -> Result<AlertStatistics, DatabaseError>;
}

#[async_trait]
pub trait Store: ThresholdRepository + AlertRepository {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    fn backend(&self) -> &'static str;
}
