mod common;

use anyhow::Result;
use reqwest::StatusCode;
use uuid::Uuid;

use crew_api::auth::{generate_jwt, Claims};
use crew_api::types::Role;

// These tests exercise the access gate without needing a database: the
// middleware rejects before any handler runs, and forged tokens are signed
// with the same development secret the spawned server uses.

fn forge_access_token(role: Role) -> String {
    let claims = Claims::access(Uuid::new_v4(), "integration-test".into(), role);
    generate_jwt(&claims).expect("token generation with dev secret")
}

#[tokio::test]
async fn protected_route_requires_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/profile", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "AUTHENTICATION_FAILED");
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/profile", server.base_url))
        .bearer_auth("not-a-real-token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn whoami_reflects_token_identity() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .bearer_auth(forge_access_token(Role::Employee))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["username"], "integration-test");
    assert_eq!(body["data"]["role"], "employee");
    Ok(())
}

#[tokio::test]
async fn hr_routes_deny_regular_accounts() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let employee_token = forge_access_token(Role::Employee);

    for path in ["/api/hr/dashboard", "/api/register"] {
        let url = format!("{}{}", server.base_url, path);
        let res = if path == "/api/register" {
            client.post(&url).bearer_auth(&employee_token).json(&serde_json::json!({})).send().await?
        } else {
            client.get(&url).bearer_auth(&employee_token).send().await?
        };
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "path {path} should be HR-only");

        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["code"], "PERMISSION_DENIED");
    }
    Ok(())
}

#[tokio::test]
async fn logout_rejects_invalid_refresh_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/logout", server.base_url))
        .bearer_auth(forge_access_token(Role::Employee))
        .json(&serde_json::json!({ "refresh_token": "bogus" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn access_token_is_not_accepted_as_refresh() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let access = forge_access_token(Role::Employee);

    let res = client
        .post(format!("{}/api/auth/logout", server.base_url))
        .bearer_auth(&access)
        .json(&serde_json::json!({ "refresh_token": access }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
