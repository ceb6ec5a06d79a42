use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::TenantScope;
use crate::database::manager::DatabaseError;
use crate::database::models::{Alert, AlertStatistics, Severity, Threshold};
use crate::database::repository::{AlertFilter, AlertRepository, Store, ThresholdFilter, ThresholdRepository};
use crate::types::{Page, PageParams};

/// Process-local store with the same scoping rules as [`super::postgres::PgStore`].
/// Used by tests and by development runs without `DATABASE_URL`.
#[derive(Clone, Default)]
pub struct MemoryStore {
    thresholds: Arc<RwLock<HashMap<Uuid, Threshold>>>,
    alerts: Arc<RwLock<HashMap<Uuid, Alert>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate<T: Clone>(mut rows: Vec<T>, page: PageParams) -> Page<T> {
    let total = rows.len() as u64;
    let start = (page.offset() as usize).min(rows.len());
    let end = start.saturating_add(page.limit as usize).min(rows.len());
    let items = rows.drain(start..end).collect();
    Page::new(items, total, page)
}

#[async_trait]
impl ThresholdRepository for MemoryStore {
    async fn insert_threshold(&self, threshold: &Threshold) -> Result<(), DatabaseError> {
        let mut thresholds = self.thresholds.write().await;
        if thresholds.contains_key(&threshold.id) {
            return Err(DatabaseError::QueryError(format!("duplicate threshold id {}", threshold.id)));
        }
        thresholds.insert(threshold.id, threshold.clone());
        Ok(())
    }

    async fn find_threshold(&self, scope: TenantScope, id: Uuid) -> Result<Option<Threshold>, DatabaseError> {
        let thresholds = self.thresholds.read().await;
        Ok(thresholds.get(&id).filter(|t| scope.contains(t.tenant_id)).cloned())
    }

    async fn list_thresholds(
        &self,
        scope: TenantScope,
        filter: &ThresholdFilter,
        page: PageParams,
    ) -> Result<Page<Threshold>, DatabaseError> {
        let thresholds = self.thresholds.read().await;
        let mut rows: Vec<Threshold> = thresholds
            .values()
            .filter(|t| scope.contains(t.tenant_id) && filter.matches(t))
            .cloned()
            .collect();
        rows.sort_by_key(|t| (Reverse(t.created_at), t.id));
        Ok(paginate(rows, page))
    }

    async fn update_threshold(&self, scope: TenantScope, threshold: &Threshold) -> Result<bool, DatabaseError> {
        let mut thresholds = self.thresholds.write().await;
        match thresholds.get_mut(&threshold.id) {
            Some(existing) if scope.contains(existing.tenant_id) => {
                // tenant ownership and creation time never change
                let tenant_id = existing.tenant_id;
                let created_at = existing.created_at;
                *existing = threshold.clone();
                existing.tenant_id = tenant_id;
                existing.created_at = created_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_threshold(&self, scope: TenantScope, id: Uuid) -> Result<bool, DatabaseError> {
        let mut thresholds = self.thresholds.write().await;
        let in_scope = thresholds.get(&id).map_or(false, |t| scope.contains(t.tenant_id));
        if !in_scope {
            return Ok(false);
        }
        thresholds.remove(&id);
        drop(thresholds);

        // mirrors ON DELETE SET NULL
        let mut alerts = self.alerts.write().await;
        for alert in alerts.values_mut().filter(|a| a.threshold_id == Some(id)) {
            alert.threshold_id = None;
        }
        Ok(true)
    }

    async fn thresholds_for_sensor(
        &self,
        scope: TenantScope,
        asset_sensor_id: Uuid,
        measurement_field: &str,
    ) -> Result<Vec<Threshold>, DatabaseError> {
        let thresholds = self.thresholds.read().await;
        let mut rows: Vec<Threshold> = thresholds
            .values()
            .filter(|t| {
                scope.contains(t.tenant_id)
                    && t.asset_sensor_id == asset_sensor_id
                    && t.measurement_field == measurement_field
            })
            .cloned()
            .collect();
        rows.sort_by_key(|t| (t.created_at, t.id));
        Ok(rows)
    }
}

#[async_trait]
impl AlertRepository for MemoryStore {
    async fn insert_alert(&self, alert: &Alert) -> Result<(), DatabaseError> {
        let mut alerts = self.alerts.write().await;
        if alerts.contains_key(&alert.id) {
            return Err(DatabaseError::QueryError(format!("duplicate alert id {}", alert.id)));
        }
        alerts.insert(alert.id, alert.clone());
        Ok(())
    }

    async fn find_alert(&self, scope: TenantScope, id: Uuid) -> Result<Option<Alert>, DatabaseError> {
        let alerts = self.alerts.read().await;
        Ok(alerts.get(&id).filter(|a| scope.contains(a.tenant_id)).cloned())
    }

    async fn list_alerts(
        &self,
        scope: TenantScope,
        filter: &AlertFilter,
        page: PageParams,
    ) -> Result<Page<Alert>, DatabaseError> {
        let alerts = self.alerts.read().await;
        let mut rows: Vec<Alert> = alerts
            .values()
            .filter(|a| scope.contains(a.tenant_id) && filter.matches(a))
            .cloned()
            .collect();
        rows.sort_by_key(|a| (Reverse(a.alert_time), a.id));
        Ok(paginate(rows, page))
    }

    async fn resolve_alert(
        &self,
        scope: TenantScope,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Alert>, DatabaseError> {
        let mut alerts = self.alerts.write().await;
        match alerts.get_mut(&id) {
            Some(alert) if scope.contains(alert.tenant_id) => {
                alert.mark_resolved(at);
                Ok(Some(alert.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_alert(&self, scope: TenantScope, id: Uuid) -> Result<bool, DatabaseError> {
        let mut alerts = self.alerts.write().await;
        let in_scope = alerts.get(&id).map_or(false, |a| scope.contains(a.tenant_id));
        if in_scope {
            alerts.remove(&id);
        }
        Ok(in_scope)
    }

    async fn alert_statistics(&self, scope: TenantScope, now: DateTime<Utc>) -> Result<AlertStatistics, DatabaseError> {
        let alerts = self.alerts.read().await;
        let day_ago = now - Duration::hours(24);
        let week_ago = now - Duration::days(7);

        let mut stats = AlertStatistics::default();
        for alert in alerts.values().filter(|a| scope.contains(a.tenant_id)) {
            stats.total += 1;
            if alert.is_resolved {
                stats.resolved += 1;
            } else {
                stats.active += 1;
            }
            match alert.severity {
                Severity::Critical => stats.critical += 1,
                Severity::Warning => stats.warning += 1,
            }
            if alert.alert_time >= day_ago {
                stats.last_24h += 1;
            }
            if alert.alert_time >= week_ago {
                stats.last_7d += 1;
            }
        }
        Ok(stats)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
