// handlers/params.rs - Query-string and body shapes shared by tenant and superadmin routes
//
// Pagination values arrive as raw strings so that junk like `?page=abc` falls
// back to defaults instead of failing the request.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::TenantId;
use crate::config::ApiConfig;
use crate::database::models::Severity;
use crate::database::repository::{AlertFilter, ThresholdFilter};
use crate::error::ApiError;
use crate::types::PageParams;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn alert_page(&self, api: &ApiConfig) -> PageParams {
        alert_page(self.page.as_deref(), self.limit.as_deref(), api)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ThresholdListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub asset_sensor_id: Option<Uuid>,
    pub sensor_type_id: Option<Uuid>,
    pub measurement_field: Option<String>,
    pub severity: Option<Severity>,
    pub is_active: Option<bool>,
}

impl ThresholdListQuery {
    pub fn filter(&self) -> ThresholdFilter {
        ThresholdFilter {
            asset_sensor_id: self.asset_sensor_id,
            sensor_type_id: self.sensor_type_id,
            measurement_field: self
                .measurement_field
                .as_deref()
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string),
            severity: self.severity,
            is_active: self.is_active,
        }
    }

    pub fn page(&self, api: &ApiConfig) -> PageParams {
        PageParams::clamped(
            self.page.as_deref(),
            self.limit.as_deref(),
            api.default_threshold_page_size,
            api.max_page_size,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AlertListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub asset_id: Option<Uuid>,
    pub asset_sensor_id: Option<Uuid>,
    pub threshold_id: Option<Uuid>,
    pub severity: Option<Severity>,
    pub is_resolved: Option<bool>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl AlertListQuery {
    pub fn filter(&self) -> Result<AlertFilter, ApiError> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(ApiError::field_error("from", "from must not be later than to"));
            }
        }
        Ok(AlertFilter {
            asset_id: self.asset_id,
            asset_sensor_id: self.asset_sensor_id,
            threshold_id: self.threshold_id,
            severity: self.severity,
            is_resolved: self.is_resolved,
            from: self.from,
            to: self.to,
        })
    }

    pub fn page(&self, api: &ApiConfig) -> PageParams {
        alert_page(self.page.as_deref(), self.limit.as_deref(), api)
    }
}

/// `?tenant_id=` filter. Extracted next to the list query so only superadmin
/// handlers can honour it.
#[derive(Debug, Default, Deserialize)]
pub struct TenantQuery {
    pub tenant_id: Option<String>,
}

impl TenantQuery {
    pub fn tenant(&self) -> Result<Option<TenantId>, ApiError> {
        tenant_filter(self.tenant_id.as_deref())
    }

    /// Tenant routes are already scoped by the token, a filter there would be ignored.
    pub fn reject(&self) -> Result<(), ApiError> {
        match self.tenant_id {
            Some(_) => Err(ApiError::field_error(
                "tenant_id",
                "tenant_id filter is only available on /superadmin routes",
            )),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkIdsRequest {
    #[serde(alias = "ids")]
    pub alert_ids: Vec<Uuid>,
}

impl BulkIdsRequest {
    /// Empty or oversized batches never reach the lifecycle manager.
    pub fn validated(self, max: usize) -> Result<Vec<Uuid>, ApiError> {
        if self.alert_ids.is_empty() {
            return Err(ApiError::field_error("alert_ids", "alert_ids must not be empty"));
        }
        if self.alert_ids.len() > max {
            return Err(ApiError::field_error(
                "alert_ids",
                format!("at most {} alert ids may be sent per request", max),
            ));
        }
        Ok(self.alert_ids)
    }
}

fn alert_page(page: Option<&str>, limit: Option<&str>, api: &ApiConfig) -> PageParams {
    PageParams::clamped(page, limit, api.default_alert_page_size, api.max_page_size)
}

fn tenant_filter(raw: Option<&str>) -> Result<Option<TenantId>, ApiError> {
    match raw.map(str::trim).filter(|t| !t.is_empty()) {
        None => Ok(None),
        Some(raw) => TenantId::parse(raw)
            .map(Some)
            .map_err(|e| ApiError::field_error("tenant_id", e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_ids_bounds() {
        let empty = BulkIdsRequest { alert_ids: vec![] };
        assert_eq!(empty.validated(100).unwrap_err().status_code(), 400);

        let too_many = BulkIdsRequest {
            alert_ids: (0..101).map(|_| Uuid::new_v4()).collect(),
        };
        assert_eq!(too_many.validated(100).unwrap_err().status_code(), 400);

        let exactly_max = BulkIdsRequest {
            alert_ids: (0..100).map(|_| Uuid::new_v4()).collect(),
        };
        assert_eq!(exactly_max.validated(100).unwrap().len(), 100);
    }

    #[test]
    fn tenant_filter_is_optional_but_must_parse() {
        assert_eq!(tenant_filter(None).unwrap(), None);
        assert_eq!(tenant_filter(Some("  ")).unwrap(), None);
        assert!(tenant_filter(Some("nope")).is_err());
        assert!(tenant_filter(Some(&Uuid::nil().to_string())).is_err());
        assert!(tenant_filter(Some(&Uuid::new_v4().to_string())).unwrap().is_some());
    }

    #[test]
    fn tenant_filter_is_refused_where_it_cannot_apply() {
        assert!(TenantQuery::default().reject().is_ok());
        let query = TenantQuery {
            tenant_id: Some(Uuid::new_v4().to_string()),
        };
        assert_eq!(query.reject().unwrap_err().status_code(), 400);
    }

    #[test]
    fn inverted_time_range_is_rejected() {
        let now = Utc::now();
        let query = AlertListQuery {
            from: Some(now),
            to: Some(now - chrono::Duration::hours(1)),
            ..Default::default()
        };
        assert!(query.filter().is_err());
    }
}
