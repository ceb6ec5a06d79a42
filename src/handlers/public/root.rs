// handlers/public/root.rs - GET / service descriptor

use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::ApiResponse;

pub async fn root(State(state): State<AppState>) -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "name": "Asset Alert API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Tenant-scoped sensor thresholds and asset alerting",
        "environment": state.config.environment,
        "storage": state.store.backend(),
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "thresholds": "/sensor-thresholds[/:id][/activate|/deactivate], /sensor-thresholds/check (protected)",
            "alerts": "/asset-alerts[/:id][/resolve], /asset-alerts/{asset,sensor}/:id, /asset-alerts/active, /asset-alerts/statistics (protected)",
            "bulk": "/asset-alerts/resolve-multiple, /asset-alerts/delete-multiple (protected, admin/manager)",
            "superadmin": "/superadmin/sensor-thresholds/*, /superadmin/asset-alerts/* (super-role only)",
        }
    }))
}
