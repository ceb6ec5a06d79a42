use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::TenantScope;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Alert, AlertStatistics, Threshold};
use crate::database::query_builder::{
    push_alert_filter, push_page, push_threshold_filter, scoped_select, ALERT_COLUMNS, THRESHOLD_COLUMNS,
};
use crate::database::repository::{AlertFilter, AlertRepository, Store, ThresholdFilter, ThresholdRepository};
use crate::types::{Page, PageParams};

/// PostgreSQL-backed store. Static statements take the scope as
/// `($n::uuid IS NULL OR tenant_id = $n)`; list queries go through
/// [`crate::database::query_builder`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn scope_param(scope: TenantScope) -> Option<Uuid> {
    scope.tenant().map(|t| t.as_uuid())
}

#[async_trait]
impl ThresholdRepository for PgStore {
    async fn insert_threshold(&self, t: &Threshold) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO sensor_thresholds (
                id, tenant_id, asset_sensor_id, sensor_type_id, measurement_field,
                min_value, max_value, severity, alert_message, notification_rules,
                is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(t.id)
        .bind(t.tenant_id.map(|id| id.as_uuid()))
        .bind(t.asset_sensor_id)
        .bind(t.sensor_type_id)
        .bind(&t.measurement_field)
        .bind(t.min_value)
        .bind(t.max_value)
        .bind(t.severity.as_str())
        .bind(&t.alert_message)
        .bind(&t.notification_rules)
        .bind(t.is_active)
        .bind(t.created_at)
        .bind(t.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_threshold(&self, scope: TenantScope, id: Uuid) -> Result<Option<Threshold>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM sensor_thresholds WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)",
            THRESHOLD_COLUMNS
        );
        let row = sqlx::query_as::<_, Threshold>(&sql)
            .bind(id)
            .bind(scope_param(scope))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_thresholds(
        &self,
        scope: TenantScope,
        filter: &ThresholdFilter,
        page: PageParams,
    ) -> Result<Page<Threshold>, DatabaseError> {
        let mut count = scoped_select("COUNT(*)", "sensor_thresholds", scope);
        push_threshold_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = scoped_select(THRESHOLD_COLUMNS, "sensor_thresholds", scope);
        push_threshold_filter(&mut select, filter);
        push_page(&mut select, "created_at DESC, id", page);
        let items = select.build_query_as::<Threshold>().fetch_all(&self.pool).await?;

        Ok(Page::new(items, total.max(0) as u64, page))
    }

    async fn update_threshold(&self, scope: TenantScope, t: &Threshold) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE sensor_thresholds SET
                asset_sensor_id = $3,
                sensor_type_id = $4,
                measurement_field = $5,
                min_value = $6,
                max_value = $7,
                severity = $8,
                alert_message = $9,
                notification_rules = $10,
                is_active = $11,
                updated_at = $12
            WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)
            "#,
        )
        .bind(t.id)
        .bind(scope_param(scope))
        .bind(t.asset_sensor_id)
        .bind(t.sensor_type_id)
        .bind(&t.measurement_field)
        .bind(t.min_value)
        .bind(t.max_value)
        .bind(t.severity.as_str())
        .bind(&t.alert_message)
        .bind(&t.notification_rules)
        .bind(t.is_active)
        .bind(t.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_threshold(&self, scope: TenantScope, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM sensor_thresholds WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)")
            .bind(id)
            .bind(scope_param(scope))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn thresholds_for_sensor(
        &self,
        scope: TenantScope,
        asset_sensor_id: Uuid,
        measurement_field: &str,
    ) -> Result<Vec<Threshold>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM sensor_thresholds \
             WHERE asset_sensor_id = $1 AND measurement_field = $2 AND ($3::uuid IS NULL OR tenant_id = $3) \
             ORDER BY created_at, id",
            THRESHOLD_COLUMNS
        );
        let rows = sqlx::query_as::<_, Threshold>(&sql)
            .bind(asset_sensor_id)
            .bind(measurement_field)
            .bind(scope_param(scope))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl AlertRepository for PgStore {
    async fn insert_alert(&self, a: &Alert) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO asset_alerts (
                id, tenant_id, asset_id, asset_sensor_id, threshold_id, measurement_field_name,
                alert_time, resolved_time, severity, trigger_value, threshold_min_value,
                threshold_max_value, alert_message, alert_type, is_resolved, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(a.id)
        .bind(a.tenant_id.map(|id| id.as_uuid()))
        .bind(a.asset_id)
        .bind(a.asset_sensor_id)
        .bind(a.threshold_id)
        .bind(&a.measurement_field_name)
        .bind(a.alert_time)
        .bind(a.resolved_time)
        .bind(a.severity.as_str())
        .bind(a.trigger_value)
        .bind(a.threshold_min_value)
        .bind(a.threshold_max_value)
        .bind(&a.alert_message)
        .bind(a.alert_type.as_str())
        .bind(a.is_resolved)
        .bind(a.created_at)
        .bind(a.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_alert(&self, scope: TenantScope, id: Uuid) -> Result<Option<Alert>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM asset_alerts WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)",
            ALERT_COLUMNS
        );
        let row = sqlx::query_as::<_, Alert>(&sql)
            .bind(id)
            .bind(scope_param(scope))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_alerts(
        &self,
        scope: TenantScope,
        filter: &AlertFilter,
        page: PageParams,
    ) -> Result<Page<Alert>, DatabaseError> {
        let mut count = scoped_select("COUNT(*)", "asset_alerts", scope);
        push_alert_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = scoped_select(ALERT_COLUMNS, "asset_alerts", scope);
        push_alert_filter(&mut select, filter);
        push_page(&mut select, "alert_time DESC, id", page);
        let items = select.build_query_as::<Alert>().fetch_all(&self.pool).await?;

        Ok(Page::new(items, total.max(0) as u64, page))
    }

    async fn resolve_alert(
        &self,
        scope: TenantScope,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Alert>, DatabaseError> {
        // Conditional update keeps resolved_time stable under concurrent resolves.
        let sql = format!(
            "UPDATE asset_alerts SET is_resolved = TRUE, resolved_time = $3, updated_at = $3 \
             WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2) AND is_resolved = FALSE \
             RETURNING {}",
            ALERT_COLUMNS
        );
        let updated = sqlx::query_as::<_, Alert>(&sql)
            .bind(id)
            .bind(scope_param(scope))
            .bind(at)
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(alert) => Ok(Some(alert)),
            None => self.find_alert(scope, id).await,
        }
    }

    async fn delete_alert(&self, scope: TenantScope, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM asset_alerts WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)")
            .bind(id)
            .bind(scope_param(scope))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn alert_statistics(&self, scope: TenantScope, now: DateTime<Utc>) -> Result<AlertStatistics, DatabaseError> {
        let stats = sqlx::query_as::<_, AlertStatistics>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE NOT is_resolved) AS active,
                COUNT(*) FILTER (WHERE is_resolved) AS resolved,
                COUNT(*) FILTER (WHERE severity = 'critical') AS critical,
                COUNT(*) FILTER (WHERE severity = 'warning') AS warning,
                COUNT(*) FILTER (WHERE alert_time >= $2) AS last_24h,
                COUNT(*) FILTER (WHERE alert_time >= $3) AS last_7d
            FROM asset_alerts
            WHERE ($1::uuid IS NULL OR tenant_id = $1)
            "#,
        )
        .bind(scope_param(scope))
        .bind(now - Duration::hours(24))
        .bind(now - Duration::days(7))
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
