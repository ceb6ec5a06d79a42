#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use asset_alert_api::auth::{generate_jwt, Claims};
use asset_alert_api::config::AppConfig;
use asset_alert_api::database::MemoryStore;
use asset_alert_api::{app, AppState};

/// In-process router over a fresh in-memory store.
pub struct TestApp {
    router: Router,
    config: Arc<AppConfig>,
}

impl TestApp {
    pub fn new() -> Self {
        let config = Arc::new(AppConfig::development());
        let state = AppState::new(Arc::new(MemoryStore::new()), config.clone());
        Self {
            router: app(state),
            config,
        }
    }

    pub fn token(&self, role: &str, tenant: Option<&str>) -> String {
        let claims = Claims::new(Uuid::new_v4(), role, tenant.map(str::to_string), 1);
        generate_jwt(&claims, &self.config.security.jwt_secret).expect("test token")
    }

    pub fn token_with_secret(&self, role: &str, tenant: Option<&str>, secret: &str) -> String {
        let claims = Claims::new(Uuid::new_v4(), role, tenant.map(str::to_string), 1);
        generate_jwt(&claims, secret).expect("test token")
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await.context("router call failed")?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body: {}", String::from_utf8_lossy(&bytes)))?
        };
        Ok((status, json))
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
        self.request(Method::PATCH, uri, Some(token), body).await
    }

    pub async fn delete(&self, uri: &str, token: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
        self.request(Method::DELETE, uri, Some(token), body).await
    }

    /// Creates a temperature threshold `[10, 30]` on a fresh sensor and returns (threshold id, sensor id).
    pub async fn seed_threshold(&self, token: &str) -> Result<(String, String)> {
        let sensor = Uuid::new_v4().to_string();
        let (status, body) = self
            .post(
                "/sensor-thresholds",
                token,
                serde_json::json!({
                    "asset_sensor_id": sensor,
                    "measurement_field": "temperature",
                    "min_value": 10,
                    "max_value": 30,
                    "severity": "warning"
                }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "seed threshold failed: {status} {body}");
        let id = body["data"]["id"].as_str().context("threshold id")?.to_string();
        Ok((id, sensor))
    }

    /// Posts a breaching reading for `sensor` and returns the created alert ids.
    pub async fn raise_alert(&self, token: &str, sensor: &str, value: f64) -> Result<Vec<String>> {
        let (status, body) = self
            .post(
                "/sensor-thresholds/check",
                token,
                serde_json::json!({
                    "asset_id": Uuid::new_v4(),
                    "asset_sensor_id": sensor,
                    "measurement_field": "temperature",
                    "value": value
                }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "check failed: {status} {body}");
        Ok(body["data"]["alert_ids"]
            .as_array()
            .context("alert_ids")?
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect())
    }
}

pub fn new_tenant() -> String {
    Uuid::new_v4().to_string()
}
