mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{new_tenant, TestApp};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn superadmin_sees_every_tenant_admin_sees_one() -> Result<()> {
    let app = TestApp::new();
    let tenant_a = new_tenant();
    let admin_a = app.token("admin", Some(&tenant_a));
    let admin_b = app.token("admin", Some(&new_tenant()));
    let (_, sensor_a) = app.seed_threshold(&admin_a).await?;
    let (_, sensor_b) = app.seed_threshold(&admin_b).await?;
    app.raise_alert(&admin_a, &sensor_a, 35.0).await?;
    app.raise_alert(&admin_b, &sensor_b, 35.0).await?;
    app.raise_alert(&admin_b, &sensor_b, 2.0).await?;

    let root = app.token("superadmin", None);
    let (status, body) = app.get("/superadmin/asset-alerts", &root).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 3);

    let (_, body) = app.get("/asset-alerts", &admin_a).await?;
    assert_eq!(body["data"]["total"], 1);
    for alert in body["data"]["items"].as_array().unwrap() {
        assert_eq!(alert["tenant_id"], tenant_a.as_str());
    }

    let (_, body) = app.get(&format!("/superadmin/asset-alerts?tenant_id={tenant_a}"), &root).await?;
    assert_eq!(body["data"]["total"], 1);

    let (status, _) = app.get("/superadmin/asset-alerts?tenant_id=garbage", &root).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn superadmin_creates_for_named_tenant() -> Result<()> {
    let app = TestApp::new();
    let root = app.token("super_admin", None);
    let target = new_tenant();

    let (status, body) = app
        .post(
            "/sensor-thresholds",
            &root,
            json!({
                "tenant_id": target,
                "asset_sensor_id": Uuid::new_v4(),
                "measurement_field": "humidity",
                "max_value": 80,
                "severity": "critical"
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["tenant_id"], target.as_str());
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let owner = app.token("viewer", Some(&target));
    let (status, _) = app.get(&format!("/sensor-thresholds/{id}"), &owner).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(
            "/sensor-thresholds",
            &root,
            json!({"asset_sensor_id": Uuid::new_v4(), "measurement_field": "h", "max_value": 1, "severity": "warning"}),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn superadmin_manages_thresholds_across_tenants() -> Result<()> {
    let app = TestApp::new();
    let admin = app.token("admin", Some(&new_tenant()));
    let (id, _) = app.seed_threshold(&admin).await?;
    app.seed_threshold(&app.token("admin", Some(&new_tenant()))).await?;
    let root = app.token("superadmin", None);

    let (_, body) = app.get("/superadmin/sensor-thresholds", &root).await?;
    assert_eq!(body["data"]["total"], 2);

    let (status, body) = app
        .put(&format!("/superadmin/sensor-thresholds/{id}"), &root, json!({"min_value": 0}))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["min_value"], 0.0);

    let (status, _) = app.delete(&format!("/superadmin/sensor-thresholds/{id}"), &root, None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/sensor-thresholds/{id}"), &admin).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn superadmin_bulk_reports_failed_ids() -> Result<()> {
    let app = TestApp::new();
    let admin_a = app.token("admin", Some(&new_tenant()));
    let admin_b = app.token("admin", Some(&new_tenant()));
    let (_, sensor_a) = app.seed_threshold(&admin_a).await?;
    let (_, sensor_b) = app.seed_threshold(&admin_b).await?;
    let a = app.raise_alert(&admin_a, &sensor_a, 35.0).await?.remove(0);
    let b = app.raise_alert(&admin_b, &sensor_b, 35.0).await?.remove(0);
    let missing = Uuid::new_v4().to_string();
    let root = app.token("superadmin", None);

    let (status, body) = app
        .patch(
            "/superadmin/asset-alerts/resolve-multiple",
            &root,
            Some(json!({ "alert_ids": [a, missing, b] })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["resolved_count"], 2);
    assert_eq!(body["data"]["failed_count"], 1);
    assert_eq!(body["data"]["total_requested"], 3);
    assert_eq!(body["data"]["failed_ids"], json!([missing]));

    let (_, stats) = app.get("/superadmin/asset-alerts/statistics", &root).await?;
    assert_eq!(stats["data"]["total"], 2);
    assert_eq!(stats["data"]["resolved"], 2);

    let (status, body) = app
        .delete(
            "/superadmin/asset-alerts/delete-multiple",
            &root,
            Some(json!({ "alert_ids": [a, b, missing] })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted_count"], 2);
    assert_eq!(body["data"]["failed_count"], 1);
    assert_eq!(body["data"]["total_requested"], 3);
    assert_eq!(body["data"]["failed_ids"], json!([missing]));
    Ok(())
}
