use chrono::{SubsecRound, Utc};
use std::sync::Arc;
use uuid::Uuid;

use super::batch::BatchResult;
use super::error::{ServiceError, ServiceResult};
use super::evaluator::BreachResult;
use crate::auth::guard::{self, OperationClass};
use crate::auth::{TenantContext, TenantId, TenantScope};
use crate::database::models::{Alert, AlertStatistics};
use crate::database::repository::{AlertFilter, Store};
use crate::types::{Page, PageParams};

/// Where a breaching reading came from.
#[derive(Debug, Clone, Copy)]
pub struct SensorRef {
    pub asset_id: Uuid,
    pub asset_sensor_id: Uuid,
}

/// Alert Lifecycle Manager. Alerts are only ever created from a breach and
/// move Open -> Resolved exactly once.
#[derive(Clone)]
pub struct AlertService {
    store: Arc<dyn Store>,
}

impl AlertService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Always inserts a new alert; repeated breaches are recorded as separate events.
    pub async fn create_from_breach(
        &self,
        ctx: &TenantContext,
        breach: &BreachResult,
        sensor: SensorRef,
    ) -> ServiceResult<Alert> {
        guard::authorize(ctx, OperationClass::Read)?;
        if !guard::allow(ctx, breach.tenant_id) {
            return Err(ServiceError::threshold_not_found(breach.threshold_id));
        }

        let now = Utc::now();
        let alert = Alert {
            id: Uuid::new_v4(),
            tenant_id: breach.tenant_id,
            asset_id: sensor.asset_id,
            asset_sensor_id: sensor.asset_sensor_id,
            threshold_id: Some(breach.threshold_id),
            measurement_field_name: breach.measurement_field.clone(),
            alert_time: now,
            resolved_time: None,
            severity: breach.severity,
            trigger_value: breach.value,
            threshold_min_value: breach.min_value,
            threshold_max_value: breach.max_value,
            alert_message: breach.message.clone(),
            alert_type: breach.direction.alert_type(),
            is_resolved: false,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_alert(&alert).await?;

        tracing::info!(
            alert_id = %alert.id,
            threshold_id = %breach.threshold_id,
            severity = %alert.severity,
            value = alert.trigger_value,
            "alert raised"
        );
        Ok(alert)
    }

    pub async fn get(&self, ctx: &TenantContext, id: Uuid) -> ServiceResult<Alert> {
        guard::authorize(ctx, OperationClass::Read)?;
        match self.store.find_alert(ctx.scope(), id).await? {
            Some(alert) if guard::allow(ctx, alert.tenant_id) => Ok(alert),
            _ => Err(ServiceError::alert_not_found(id)),
        }
    }

    pub async fn list(&self, ctx: &TenantContext, filter: &AlertFilter, page: PageParams) -> ServiceResult<Page<Alert>> {
        guard::authorize(ctx, OperationClass::Read)?;
        Ok(self.store.list_alerts(ctx.scope(), filter, page).await?)
    }

    pub async fn list_by_asset(&self, ctx: &TenantContext, asset_id: Uuid, page: PageParams) -> ServiceResult<Page<Alert>> {
        let filter = AlertFilter {
            asset_id: Some(asset_id),
            ..Default::default()
        };
        self.list(ctx, &filter, page).await
    }

    pub async fn list_by_sensor(
        &self,
        ctx: &TenantContext,
        asset_sensor_id: Uuid,
        page: PageParams,
    ) -> ServiceResult<Page<Alert>> {
        let filter = AlertFilter {
            asset_sensor_id: Some(asset_sensor_id),
            ..Default::default()
        };
        self.list(ctx, &filter, page).await
    }

    pub async fn list_active(&self, ctx: &TenantContext, page: PageParams) -> ServiceResult<Page<Alert>> {
        let filter = AlertFilter {
            is_resolved: Some(false),
            ..Default::default()
        };
        self.list(ctx, &filter, page).await
    }

    /// Cross-tenant listing for the super-role, optionally narrowed to one tenant.
    pub async fn list_global(
        &self,
        ctx: &TenantContext,
        tenant: Option<TenantId>,
        filter: &AlertFilter,
        page: PageParams,
    ) -> ServiceResult<Page<Alert>> {
        guard::authorize(ctx, OperationClass::Global)?;
        let scope = tenant.map_or(TenantScope::Global, TenantScope::Tenant);
        Ok(self.store.list_alerts(scope, filter, page).await?)
    }

    /// Idempotent: resolving a resolved alert returns it unchanged.
    pub async fn resolve(&self, ctx: &TenantContext, id: Uuid) -> ServiceResult<Alert> {
        guard::authorize(ctx, OperationClass::Write)?;
        self.resolve_one(ctx, id).await
    }

    pub async fn delete(&self, ctx: &TenantContext, id: Uuid) -> ServiceResult<()> {
        guard::authorize(ctx, OperationClass::Write)?;
        if !self.store.delete_alert(ctx.scope(), id).await? {
            return Err(ServiceError::alert_not_found(id));
        }
        tracing::info!(alert_id = %id, actor = %ctx.actor_id(), "alert deleted");
        Ok(())
    }

    /// Best effort: each id is resolved on its own and failures are reported,
    /// never propagated. A role failure still rejects the whole call.
    pub async fn bulk_resolve(&self, ctx: &TenantContext, ids: &[Uuid]) -> ServiceResult<BatchResult<Alert>> {
        guard::authorize(ctx, OperationClass::Write)?;

        let mut batch = BatchResult::default();
        for &id in ids {
            match self.resolve_one(ctx, id).await {
                Ok(alert) => batch.push_ok(alert),
                Err(err) => batch.push_err(id, failure_reason(id, &err)),
            }
        }
        tracing::info!(
            actor = %ctx.actor_id(),
            resolved = batch.succeeded.len(),
            failed = batch.failed.len(),
            "bulk resolve finished"
        );
        Ok(batch)
    }

    pub async fn bulk_delete(&self, ctx: &TenantContext, ids: &[Uuid]) -> ServiceResult<BatchResult<Uuid>> {
        guard::authorize(ctx, OperationClass::Write)?;

        let mut batch = BatchResult::default();
        for &id in ids {
            match self.store.delete_alert(ctx.scope(), id).await {
                Ok(true) => batch.push_ok(id),
                Ok(false) => batch.push_err(id, "not found"),
                Err(err) => batch.push_err(id, failure_reason(id, &ServiceError::from(err))),
            }
        }
        tracing::info!(
            actor = %ctx.actor_id(),
            deleted = batch.succeeded.len(),
            failed = batch.failed.len(),
            "bulk delete finished"
        );
        Ok(batch)
    }

    pub async fn statistics(&self, ctx: &TenantContext) -> ServiceResult<AlertStatistics> {
        guard::authorize(ctx, OperationClass::Read)?;
        Ok(self.store.alert_statistics(ctx.scope(), Utc::now()).await?)
    }

    pub async fn statistics_global(&self, ctx: &TenantContext, tenant: Option<TenantId>) -> ServiceResult<AlertStatistics> {
        guard::authorize(ctx, OperationClass::Global)?;
        let scope = tenant.map_or(TenantScope::Global, TenantScope::Tenant);
        Ok(self.store.alert_statistics(scope, Utc::now()).await?)
    }

    async fn resolve_one(&self, ctx: &TenantContext, id: Uuid) -> ServiceResult<Alert> {
        // postgres keeps microseconds
        let now = Utc::now().trunc_subsecs(6);
        let alert = self
            .store
            .resolve_alert(ctx.scope(), id, now)
            .await?
            .filter(|a| guard::allow(ctx, a.tenant_id))
            .ok_or_else(|| ServiceError::alert_not_found(id))?;

        if alert.resolved_time == Some(now) {
            tracing::info!(alert_id = %id, actor = %ctx.actor_id(), "alert resolved");
        }
        Ok(alert)
    }
}

fn failure_reason(id: Uuid, err: &ServiceError) -> String {
    match err {
        ServiceError::NotFound { .. } => "not found".to_string(),
        ServiceError::Database(db) => {
            tracing::error!(alert_id = %id, error = %db, "storage failure inside batch");
            "storage error".to_string()
        }
        other => other.to_string(),
    }
}
