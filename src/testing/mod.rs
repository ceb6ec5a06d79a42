//! Fixtures shared by unit tests.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{TenantContext, TenantId};
use crate::database::memory::MemoryStore;
use crate::database::models::{Alert, AlertType, Severity, Threshold};
use crate::database::repository::Store;

pub fn tenant() -> TenantId {
    TenantId::from_uuid(Uuid::new_v4()).expect("v4 uuid is never nil")
}

pub fn ctx(role: &str, tenant: TenantId) -> TenantContext {
    TenantContext::resolve(Uuid::new_v4(), role, Some(&tenant.to_string())).expect("valid test context")
}

pub fn super_ctx() -> TenantContext {
    TenantContext::resolve(Uuid::new_v4(), "superadmin", None).expect("valid test context")
}

pub fn memory_store() -> Arc<dyn Store> {
    Arc::new(MemoryStore::new())
}

pub fn threshold_fixture(tenant: TenantId, field: &str, min: Option<f64>, max: Option<f64>) -> Threshold {
    let now = Utc::now();
    Threshold {
        id: Uuid::new_v4(),
        tenant_id: Some(tenant),
        asset_sensor_id: Uuid::new_v4(),
        sensor_type_id: None,
        measurement_field: field.to_string(),
        min_value: min,
        max_value: max,
        severity: Severity::Warning,
        alert_message: None,
        notification_rules: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn alert_fixture(tenant: TenantId, severity: Severity) -> Alert {
    let now = Utc::now();
    Alert {
        id: Uuid::new_v4(),
        tenant_id: Some(tenant),
        asset_id: Uuid::new_v4(),
        asset_sensor_id: Uuid::new_v4(),
        threshold_id: None,
        measurement_field_name: "temperature".to_string(),
        alert_time: now,
        resolved_time: None,
        severity,
        trigger_value: 42.0,
        threshold_min_value: Some(10.0),
        threshold_max_value: Some(30.0),
        alert_message: "temperature above 30".to_string(),
        alert_type: AlertType::ThresholdAboveMax,
        is_resolved: false,
        created_at: now,
        updated_at: now,
    }
}
