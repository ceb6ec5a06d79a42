//! Dynamic WHERE / pagination fragments for the PostgreSQL store.
//!
//! Builders start from `... WHERE 1=1` so every helper can append `AND ...`.

use sqlx::{Postgres, QueryBuilder};

use crate::auth::TenantScope;
use crate::database::repository::{AlertFilter, ThresholdFilter};
use crate::types::PageParams;

pub const THRESHOLD_COLUMNS: &str = "id, tenant_id, asset_sensor_id, sensor_type_id, measurement_field, \
     min_value, max_value, severity, alert_message, notification_rules, is_active, created_at, updated_at";

pub const ALERT_COLUMNS: &str = "id, tenant_id, asset_id, asset_sensor_id, threshold_id, measurement_field_name, \
     alert_time, resolved_time, severity, trigger_value, threshold_min_value, threshold_max_value, \
     alert_message, alert_type, is_resolved, created_at, updated_at";

/// `SELECT <select> FROM <table> WHERE 1=1` plus the tenant condition.
pub fn scoped_select<'a>(select: &str, table: &str, scope: TenantScope) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM {} WHERE 1=1", select, table));
    push_scope(&mut qb, scope);
    qb
}

pub fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: TenantScope) {
    if let TenantScope::Tenant(tenant) = scope {
        qb.push(" AND tenant_id = ").push_bind(tenant.as_uuid());
    }
}

pub fn push_threshold_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ThresholdFilter) {
    if let Some(v) = filter.asset_sensor_id {
        qb.push(" AND asset_sensor_id = ").push_bind(v);
    }
    if let Some(v) = filter.sensor_type_id {
        qb.push(" AND sensor_type_id = ").push_bind(v);
    }
    if let Some(v) = &filter.measurement_field {
        qb.push(" AND measurement_field = ").push_bind(v.clone());
    }
    if let Some(v) = filter.severity {
        qb.push(" AND severity = ").push_bind(v.as_str());
    }
    if let Some(v) = filter.is_active {
        qb.push(" AND is_active = ").push_bind(v);
    }
}

pub fn push_alert_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &AlertFilter) {
    if let Some(v) = filter.asset_id {
        qb.push(" AND asset_id = ").push_bind(v);
    }
    if let Some(v) = filter.asset_sensor_id {
        qb.push(" AND asset_sensor_id = ").push_bind(v);
    }
    if let Some(v) = filter.threshold_id {
        qb.push(" AND threshold_id = ").push_bind(v);
    }
    if let Some(v) = filter.severity {
        qb.push(" AND severity = ").push_bind(v.as_str());
    }
    if let Some(v) = filter.is_resolved {
        qb.push(" AND is_resolved = ").push_bind(v);
    }
    if let Some(v) = filter.from {
        qb.push(" AND alert_time >= ").push_bind(v);
    }
    if let Some(v) = filter.to {
        qb.push(" AND alert_time <= ").push_bind(v);
    }
}

pub fn push_page(qb: &mut QueryBuilder<'_, Postgres>, order_by: &str, page: PageParams) {
    qb.push(" ORDER BY ")
        .push(order_by)
        .push(" LIMIT ")
        .push_bind(page.limit as i64)
        .push(" OFFSET ")
        .push_bind(page.offset() as i64);
}
