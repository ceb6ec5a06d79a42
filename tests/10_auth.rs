mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use common::{new_tenant, TestApp};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/health", None, None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["storage"], "memory");
    Ok(())
}

#[tokio::test]
async fn root_describes_service() -> Result<()> {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/", None, None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["endpoints"]["thresholds"].is_string());
    Ok(())
}

#[tokio::test]
async fn missing_token_is_unauthorized() -> Result<()> {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/sensor-thresholds", None, None).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["error"], true);
    Ok(())
}

#[tokio::test]
async fn token_signed_with_other_secret_is_unauthorized() -> Result<()> {
    let app = TestApp::new();
    let forged = app.token_with_secret("admin", Some(&new_tenant()), "not-the-server-secret");
    let (status, _) = app.get("/asset-alerts", &forged).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn tenant_role_without_tenant_claim_is_unauthorized() -> Result<()> {
    let app = TestApp::new();
    for role in ["admin", "manager", "user", "viewer"] {
        let token = app.token(role, None);
        let (status, body) = app.get("/sensor-thresholds", &token).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{role}");
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    let nil = app.token("admin", Some("00000000-0000-0000-0000-000000000000"));
    let (status, _) = app.get("/sensor-thresholds", &nil).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn unknown_role_fails_closed() -> Result<()> {
    let app = TestApp::new();
    let token = app.token("owner", Some(&new_tenant()));
    let (status, _) = app.get("/asset-alerts", &token).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn legacy_admin_alias_can_write() -> Result<()> {
    let app = TestApp::new();
    let token = app.token("tenant_admin", Some(&new_tenant()));
    app.seed_threshold(&token).await?;
    Ok(())
}

#[tokio::test]
async fn superadmin_routes_reject_tenant_roles() -> Result<()> {
    let app = TestApp::new();
    let admin = app.token("admin", Some(&new_tenant()));
    for uri in ["/superadmin/asset-alerts", "/superadmin/sensor-thresholds", "/superadmin/asset-alerts/statistics"] {
        let (status, body) = app.get(uri, &admin).await?;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body["code"], "FORBIDDEN");
    }
    Ok(())
}
