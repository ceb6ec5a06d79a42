//! Router assembly: public, tenant-scoped and superadmin route groups over a
//! shared [`AppState`].

use axum::{
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::Store;
use crate::handlers::{elevated::superadmin, protected, public};
use crate::middleware::{jwt_auth_middleware, require_super_admin, tenant_context_middleware};
use crate::services::{AlertService, ThresholdService};

#[derive(Clone)]
pub struct AppState {
    pub thresholds: ThresholdService,
    pub alerts: AlertService,
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Self {
        Self {
            thresholds: ThresholdService::new(store.clone()),
            alerts: AlertService::new(store.clone()),
            store,
            config,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected (tenant-scoped)
        .merge(threshold_routes(&state))
        .merge(alert_routes(&state))
        // Elevated (super-role only)
        .merge(superadmin_routes(&state))
        .with_state(state.clone())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    if state.config.security.enable_cors {
        router.layer(cors_layer(&state.config.security))
    } else {
        router
    }
}

fn threshold_routes(state: &AppState) -> Router<AppState> {
    use protected::thresholds;

    Router::new()
        .route("/sensor-thresholds", get(thresholds::list).post(thresholds::create))
        .route("/sensor-thresholds/check", post(thresholds::check))
        .route(
            "/sensor-thresholds/:id",
            get(thresholds::show).put(thresholds::update).delete(thresholds::delete),
        )
        .route("/sensor-thresholds/:id/activate", post(thresholds::activate))
        .route("/sensor-thresholds/:id/deactivate", post(thresholds::deactivate))
        .route_layer(from_fn(tenant_context_middleware))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn alert_routes(state: &AppState) -> Router<AppState> {
    use axum::routing::delete;
    use protected::alerts;

    Router::new()
        .route("/asset-alerts", get(alerts::list))
        .route("/asset-alerts/active", get(alerts::active))
        .route("/asset-alerts/statistics", get(alerts::statistics))
        .route("/asset-alerts/resolve-multiple", patch(alerts::resolve_multiple))
        .route("/asset-alerts/delete-multiple", delete(alerts::delete_multiple))
        .route("/asset-alerts/asset/:id", get(alerts::by_asset))
        .route("/asset-alerts/sensor/:id", get(alerts::by_sensor))
        .route("/asset-alerts/:id", get(alerts::show).delete(alerts::delete))
        .route("/asset-alerts/:id/resolve", patch(alerts::resolve))
        .route_layer(from_fn(tenant_context_middleware))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn superadmin_routes(state: &AppState) -> Router<AppState> {
    use axum::routing::delete;
    use superadmin::{alerts, thresholds};

    Router::new()
        .route("/superadmin/sensor-thresholds", get(thresholds::list))
        .route(
            "/superadmin/sensor-thresholds/:id",
            get(thresholds::show).put(thresholds::update).delete(thresholds::delete),
        )
        .route("/superadmin/asset-alerts", get(alerts::list))
        .route("/superadmin/asset-alerts/statistics", get(alerts::statistics))
        .route("/superadmin/asset-alerts/resolve-multiple", patch(alerts::resolve_multiple))
        .route("/superadmin/asset-alerts/delete-multiple", delete(alerts::delete_multiple))
        .route("/superadmin/asset-alerts/:id", get(alerts::show))
        .route("/superadmin/asset-alerts/:id/resolve", patch(alerts::resolve))
        .route_layer(from_fn(require_super_admin))
        .route_layer(from_fn(tenant_context_middleware))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new().allow_origin(origins).allow_methods(Any).allow_headers(Any)
}
