//! Auth API tests: login, logout and token handling.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;

use common::fixtures;
use common::TestContext;

#[tokio::test]
async fn login_with_seeded_user() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/auth/login")
        .json(&fixtures::login_body("toxir", "toxir123"))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["token"], "user_toxir");
    assert_eq!(body["user"]["code"], "toxir");
    assert_eq!(body["user"]["username"], "Toxir");
    assert_eq!(body["user"]["isAdmin"], false);
}

#[tokio::test]
async fn user_code_starting_with_admin_is_still_a_user() {
    // "admin_ismoil" is a plain user code; the prefix must not promote it.
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/auth/login")
        .json(&fixtures::login_body("admin_ismoil", "ismoil123"))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["token"], "user_admin_ismoil");
    assert_eq!(body["user"]["isAdmin"], false);
}

#[tokio::test]
async fn login_trims_whitespace() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/auth/login")
        .json(&fixtures::login_body("  toxir  ", " toxir123 "))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/auth/login")
        .json(&fixtures::login_body("toxir", "nope"))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "wrong password");
}

#[tokio::test]
async fn login_rejects_unknown_code() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/auth/login")
        .json(&fixtures::login_body("ghost", "whatever"))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_empty_fields() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/auth/login")
        .json(&fixtures::login_body("", "toxir123"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/auth/login")
        .json(&fixtures::login_body("toxir", "   "))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_login_uses_config_credentials() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/auth/login")
        .json(&fixtures::login_body(common::ADMIN_CODE, common::ADMIN_PASSWORD))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["token"], format!("admin_{}", common::ADMIN_CODE));
    assert_eq!(body["user"]["isAdmin"], true);
    assert_eq!(body["user"]["username"], "Super Admin");

    let response = server
        .post("/api/auth/login")
        .json(&fixtures::login_body(common::ADMIN_CODE, "wrong"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_route_requires_token() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server.get("/api/user/sync").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .get("/api/user/sync")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value("user_ghost"),
        )
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .get("/api/user/sync")
        .add_header(axum::http::header::AUTHORIZATION, "Basic abc".to_string())
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_acknowledges() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let token = common::login_token(&server, "toxir", "toxir123").await;

    let response = server
        .post("/api/auth/logout")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
}
