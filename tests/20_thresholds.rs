mod common;

use anyhow::Result;
use axum::http::{header, Method, Request, StatusCode};
use axum::body::Body;
use common::{new_tenant, TestApp};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn breaching_reading_yields_one_warning() -> Result<()> {
    let app = TestApp::new();
    let token = app.token("admin", Some(&new_tenant()));
    let (threshold_id, sensor) = app.seed_threshold(&token).await?;

    let (status, body) = app
        .post(
            "/sensor-thresholds/check",
            &token,
            json!({
                "asset_id": Uuid::new_v4(),
                "asset_sensor_id": sensor,
                "measurement_field": "temperature",
                "value": 35
            }),
        )
        .await?;

    assert_eq!(status, StatusCode::OK);
    let breaches = body["data"]["breaches"].as_array().unwrap();
    assert_eq!(breaches.len(), 1);
    assert_eq!(breaches[0]["is_breached"], true);
    assert_eq!(breaches[0]["severity"], "warning");
    assert_eq!(breaches[0]["direction"], "above_max");
    assert_eq!(breaches[0]["threshold_id"], threshold_id.as_str());
    assert_eq!(body["data"]["alert_ids"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn in_range_reading_yields_nothing() -> Result<()> {
    let app = TestApp::new();
    let token = app.token("admin", Some(&new_tenant()));
    let (_, sensor) = app.seed_threshold(&token).await?;

    for value in [20.0, 10.0, 30.0] {
        let alerts = app.raise_alert(&token, &sensor, value).await?;
        assert!(alerts.is_empty(), "{value} raised an alert");
    }
    Ok(())
}

#[tokio::test]
async fn foreign_threshold_is_not_found() -> Result<()> {
    let app = TestApp::new();
    let owner = app.token("admin", Some(&new_tenant()));
    let (id, _) = app.seed_threshold(&owner).await?;

    let stranger = app.token("admin", Some(&new_tenant()));
    let (status, body) = app.get(&format!("/sensor-thresholds/{id}"), &stranger).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (missing, _) = app.get(&format!("/sensor-thresholds/{}", Uuid::new_v4()), &stranger).await?;
    assert_eq!(missing, status);
    Ok(())
}

#[tokio::test]
async fn read_roles_cannot_write() -> Result<()> {
    let app = TestApp::new();
    let tenant = new_tenant();
    let admin = app.token("admin", Some(&tenant));
    let (id, _) = app.seed_threshold(&admin).await?;

    let viewer = app.token("viewer", Some(&tenant));
    let (status, body) = app
        .post(
            "/sensor-thresholds",
            &viewer,
            json!({"asset_sensor_id": Uuid::new_v4(), "measurement_field": "t", "max_value": 1, "severity": "warning"}),
        )
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = app.delete(&format!("/sensor-thresholds/{id}"), &viewer, None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get(&format!("/sensor-thresholds/{id}"), &viewer).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn partial_update_touches_only_severity() -> Result<()> {
    let app = TestApp::new();
    let token = app.token("manager", Some(&new_tenant()));
    let (id, sensor) = app.seed_threshold(&token).await?;

    let (status, body) = app
        .put(&format!("/sensor-thresholds/{id}"), &token, json!({"severity": "critical"}))
        .await?;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["severity"], "critical");
    assert_eq!(data["min_value"], 10.0);
    assert_eq!(data["max_value"], 30.0);
    assert_eq!(data["measurement_field"], "temperature");
    assert_eq!(data["asset_sensor_id"], sensor.as_str());
    assert_eq!(data["is_active"], true);
    Ok(())
}

#[tokio::test]
async fn null_clears_one_bound_but_not_both() -> Result<()> {
    let app = TestApp::new();
    let token = app.token("admin", Some(&new_tenant()));
    let (id, _) = app.seed_threshold(&token).await?;

    let (status, body) = app
        .put(&format!("/sensor-thresholds/{id}"), &token, json!({"min_value": null}))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["min_value"].is_null());
    assert_eq!(body["data"]["max_value"], 30.0);

    let (status, body) = app
        .put(&format!("/sensor-thresholds/{id}"), &token, json!({"max_value": null}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn inverted_bounds_are_rejected() -> Result<()> {
    let app = TestApp::new();
    let token = app.token("admin", Some(&new_tenant()));
    let (status, body) = app
        .post(
            "/sensor-thresholds",
            &token,
            json!({"asset_sensor_id": Uuid::new_v4(), "measurement_field": "t", "min_value": 5, "max_value": 1, "severity": "warning"}),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (id, _) = app.seed_threshold(&token).await?;
    let (status, _) = app.put(&format!("/sensor-thresholds/{id}"), &token, json!({"max_value": 5})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn unknown_severity_is_rejected() -> Result<()> {
    let app = TestApp::new();
    let token = app.token("admin", Some(&new_tenant()));
    let (status, body) = app
        .post(
            "/sensor-thresholds",
            &token,
            json!({"asset_sensor_id": Uuid::new_v4(), "measurement_field": "t", "max_value": 1, "severity": "info"}),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"]["severity"].is_string(), true);
    Ok(())
}

#[tokio::test]
async fn malformed_json_and_ids_are_bad_requests() -> Result<()> {
    let app = TestApp::new();
    let token = app.token("admin", Some(&new_tenant()));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/sensor-thresholds")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;
    let (status, body) = app.send(request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");

    let (status, _) = app.get("/sensor-thresholds/not-a-uuid", &token).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn foreign_tenant_in_body_is_forbidden() -> Result<()> {
    let app = TestApp::new();
    let token = app.token("admin", Some(&new_tenant()));
    let (status, _) = app
        .post(
            "/sensor-thresholds",
            &token,
            json!({
                "tenant_id": new_tenant(),
                "asset_sensor_id": Uuid::new_v4(),
                "measurement_field": "t",
                "max_value": 1,
                "severity": "warning"
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn deactivated_threshold_stops_alerting() -> Result<()> {
    let app = TestApp::new();
    let token = app.token("admin", Some(&new_tenant()));
    let (id, sensor) = app.seed_threshold(&token).await?;

    let (status, body) = app.request(Method::POST, &format!("/sensor-thresholds/{id}/deactivate"), Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_active"], false);
    assert!(app.raise_alert(&token, &sensor, 99.0).await?.is_empty());

    let (status, _) = app.request(Method::POST, &format!("/sensor-thresholds/{id}/activate"), Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.raise_alert(&token, &sensor, 99.0).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn list_is_tenant_scoped_and_paginated() -> Result<()> {
    let app = TestApp::new();
    let token = app.token("admin", Some(&new_tenant()));
    for _ in 0..3 {
        app.seed_threshold(&token).await?;
    }
    let other = app.token("admin", Some(&new_tenant()));
    app.seed_threshold(&other).await?;

    let (status, body) = app.get("/sensor-thresholds?limit=2&page=abc", &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["limit"], 2);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);

    let (_, body) = app.get("/sensor-thresholds", &token).await?;
    assert_eq!(body["data"]["limit"], 10);

    let (_, body) = app.get("/sensor-thresholds?limit=5000", &token).await?;
    assert_eq!(body["data"]["limit"], 100);
    Ok(())
}

#[tokio::test]
async fn delete_removes_threshold() -> Result<()> {
    let app = TestApp::new();
    let token = app.token("admin", Some(&new_tenant()));
    let (id, _) = app.seed_threshold(&token).await?;

    let (status, _) = app.delete(&format!("/sensor-thresholds/{id}"), &token, None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/sensor-thresholds/{id}"), &token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
