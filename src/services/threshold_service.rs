use chrono::Utc;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use crate::auth::guard::{self, OperationClass};
use crate::auth::{TenantContext, TenantId, TenantScope};
use crate::database::models::{Severity, Threshold};
use crate::database::repository::{Store, ThresholdFilter};
use crate::types::{Page, PageParams};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateThreshold {
    /// Honoured for the super-role; must equal the caller's own tenant otherwise.
    pub tenant_id: Option<String>,
    pub asset_sensor_id: Uuid,
    pub sensor_type_id: Option<Uuid>,
    pub measurement_field: String,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub severity: String,
    pub alert_message: Option<String>,
    pub notification_rules: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}

/// Partial update. `None` leaves the stored value untouched.
///
/// Nullable columns take `Option<Option<T>>`: `Some(Some(v))` = set,
/// `Some(None)` (JSON `null`) = clear, absent = no change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateThreshold {
    pub asset_sensor_id: Option<Uuid>,
    #[serde(default, deserialize_with = "nullable")]
    pub sensor_type_id: Option<Option<Uuid>>,
    pub measurement_field: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub min_value: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub max_value: Option<Option<f64>>,
    pub severity: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub alert_message: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notification_rules: Option<Option<serde_json::Value>>,
    pub is_active: Option<bool>,
}

// Only runs when the key is present, so a JSON null arrives as Some(None).
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Threshold Catalog: tenant-scoped CRUD and activation lifecycle.
#[derive(Clone)]
pub struct ThresholdService {
    store: Arc<dyn Store>,
}

impl ThresholdService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, ctx: &TenantContext, input: CreateThreshold) -> ServiceResult<Threshold> {
        guard::authorize(ctx, OperationClass::Write)?;

        let tenant_id = owning_tenant(ctx, input.tenant_id.as_deref())?;
        let severity = parse_severity(&input.severity)?;
        let measurement_field = input.measurement_field.trim().to_string();
        validate_field(&measurement_field)?;
        validate_bounds(input.min_value, input.max_value)?;

        let now = Utc::now();
        let threshold = Threshold {
            id: Uuid::new_v4(),
            tenant_id: Some(tenant_id),
            asset_sensor_id: input.asset_sensor_id,
            sensor_type_id: input.sensor_type_id,
            measurement_field,
            min_value: input.min_value,
            max_value: input.max_value,
            severity,
            alert_message: input.alert_message,
            notification_rules: input.notification_rules,
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.store.insert_threshold(&threshold).await?;

        tracing::info!(
            threshold_id = %threshold.id,
            tenant_id = %tenant_id,
            field = %threshold.measurement_field,
            "threshold created"
        );
        Ok(threshold)
    }

    pub async fn get(&self, ctx: &TenantContext, id: Uuid) -> ServiceResult<Threshold> {
        guard::authorize(ctx, OperationClass::Read)?;
        self.load(ctx, id).await
    }

    pub async fn list(
        &self,
        ctx: &TenantContext,
        filter: &ThresholdFilter,
        page: PageParams,
    ) -> ServiceResult<Page<Threshold>> {
        guard::authorize(ctx, OperationClass::Read)?;
        Ok(self.store.list_thresholds(ctx.scope(), filter, page).await?)
    }

    /// Cross-tenant listing, optionally narrowed to one tenant.
    pub async fn list_all(
        &self,
        ctx: &TenantContext,
        tenant: Option<TenantId>,
        filter: &ThresholdFilter,
        page: PageParams,
    ) -> ServiceResult<Page<Threshold>> {
        guard::authorize(ctx, OperationClass::Global)?;
        let scope = tenant.map_or(TenantScope::Global, TenantScope::Tenant);
        Ok(self.store.list_thresholds(scope, filter, page).await?)
    }

    pub async fn update(&self, ctx: &TenantContext, id: Uuid, patch: UpdateThreshold) -> ServiceResult<Threshold> {
        guard::authorize(ctx, OperationClass::Write)?;
        let mut threshold = self.load(ctx, id).await?;

        if let Some(sensor) = patch.asset_sensor_id {
            threshold.asset_sensor_id = sensor;
        }
        if let Some(sensor_type) = patch.sensor_type_id {
            threshold.sensor_type_id = sensor_type;
        }
        if let Some(field) = patch.measurement_field {
            let field = field.trim().to_string();
            validate_field(&field)?;
            threshold.measurement_field = field;
        }
        if let Some(min) = patch.min_value {
            threshold.min_value = min;
        }
        if let Some(max) = patch.max_value {
            threshold.max_value = max;
        }
        if let Some(severity) = patch.severity.as_deref() {
            threshold.severity = parse_severity(severity)?;
        }
        if let Some(message) = patch.alert_message {
            threshold.alert_message = message;
        }
        if let Some(rules) = patch.notification_rules {
            threshold.notification_rules = rules;
        }
        if let Some(active) = patch.is_active {
            threshold.is_active = active;
        }

        // checked on the merged result so a lone min or max cannot invert the range
        validate_bounds(threshold.min_value, threshold.max_value)?;
        threshold.updated_at = Utc::now();

        if !self.store.update_threshold(ctx.scope(), &threshold).await? {
            return Err(ServiceError::threshold_not_found(id));
        }
        tracing::info!(threshold_id = %id, actor = %ctx.actor_id(), "threshold updated");
        Ok(threshold)
    }

    pub async fn set_active(&self, ctx: &TenantContext, id: Uuid, active: bool) -> ServiceResult<Threshold> {
        let patch = UpdateThreshold {
            is_active: Some(active),
            ..Default::default()
        };
        self.update(ctx, id, patch).await
    }

    pub async fn delete(&self, ctx: &TenantContext, id: Uuid) -> ServiceResult<()> {
        guard::authorize(ctx, OperationClass::Write)?;
        // load first so a foreign row reports exactly like a missing one
        self.load(ctx, id).await?;
        if !self.store.delete_threshold(ctx.scope(), id).await? {
            return Err(ServiceError::threshold_not_found(id));
        }
        tracing::info!(threshold_id = %id, actor = %ctx.actor_id(), "threshold deleted");
        Ok(())
    }

    /// Every threshold configured for a sensor field inside the caller's scope.
    pub async fn for_sensor(
        &self,
        ctx: &TenantContext,
        asset_sensor_id: Uuid,
        measurement_field: &str,
    ) -> ServiceResult<Vec<Threshold>> {
        guard::authorize(ctx, OperationClass::Read)?;
        let rows = self
            .store
            .thresholds_for_sensor(ctx.scope(), asset_sensor_id, measurement_field)
            .await?;
        Ok(rows.into_iter().filter(|t| guard::allow(ctx, t.tenant_id)).collect())
    }

    async fn load(&self, ctx: &TenantContext, id: Uuid) -> ServiceResult<Threshold> {
        match self.store.find_threshold(ctx.scope(), id).await? {
            Some(t) if guard::allow(ctx, t.tenant_id) => Ok(t),
            _ => Err(ServiceError::threshold_not_found(id)),
        }
    }
}

/// Tenant that will own a new threshold.
fn owning_tenant(ctx: &TenantContext, requested: Option<&str>) -> ServiceResult<TenantId> {
    let requested = requested
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(TenantId::parse)
        .transpose()?;

    if ctx.is_super_admin() {
        return requested
            .or(ctx.tenant_id())
            .ok_or_else(|| ServiceError::validation("tenant_id", "tenant_id is required when acting as superadmin"));
    }

    let own = ctx
        .tenant_id()
        .ok_or_else(|| ServiceError::Forbidden("Caller has no tenant".to_string()))?;
    match requested {
        Some(other) if other != own => {
            tracing::warn!(actor = %ctx.actor_id(), own = %own, requested = %other, "cross-tenant create refused");
            Err(ServiceError::Forbidden("Cannot create thresholds for another tenant".to_string()))
        }
        _ => Ok(own),
    }
}

fn parse_severity(raw: &str) -> ServiceResult<Severity> {
    raw.trim()
        .to_ascii_lowercase()
        .parse::<Severity>()
        .map_err(|e| ServiceError::validation("severity", e.to_string()))
}

fn validate_field(field: &str) -> ServiceResult<()> {
    if field.is_empty() {
        return Err(ServiceError::validation("measurement_field", "measurement_field must not be empty"));
    }
    Ok(())
}

fn validate_bounds(min: Option<f64>, max: Option<f64>) -> ServiceResult<()> {
    if min.is_none() && max.is_none() {
        return Err(ServiceError::validation("min_value", "at least one of min_value or max_value is required"));
    }
    if min.map_or(false, |v| !v.is_finite()) {
        return Err(ServiceError::validation("min_value", "min_value must be a finite number"));
    }
    if max.map_or(false, |v| !v.is_finite()) {
        return Err(ServiceError::validation("max_value", "max_value must be a finite number"));
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ServiceError::validation(
                "min_value",
                format!("min_value ({min}) must not exceed max_value ({max})"),
            ));
        }
    }
    Ok(())
}
