mod common;

use common::{PASSWORD, TestApp};
use http::{Method, StatusCode};
use serde_json::json;
use shared::models::Role;

fn registration(username: &str, aadhaar: &str) -> serde_json::Value {
    json!({
        "name": "Asha Rao",
        "username": username,
        "password": "secret12",
        "aadhaar_number": aadhaar,
        "location": "Ward 4",
    })
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.request(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_protected_route_needs_token() {
    let app = TestApp::new().await;
    let (status, body) = app.request(Method::GET, "/api/posts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, _) = app
        .request(Method::GET, "/api/posts", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_me() {
    let app = TestApp::new().await;
    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(registration("asha", "123456789012")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["user"]["role"], "citizen");
    assert!(body["user"].get("hash_pass").is_none());

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "asha", "password": "secret12"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "asha");
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = TestApp::new().await;
    app.seed("ravi", Role::Government, Some("roads")).await;
    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "ravi", "password": "not-the-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "ravi", "password": PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_citizen_cannot_register_as_government() {
    let app = TestApp::new().await;
    let mut body = registration("ravi", "123456789012");
    body["role"] = json!("government");
    body["department"] = json!("roads");
    let (status, response) = app
        .request(Method::POST, "/api/auth/register", None, Some(body))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["code"], 2006);
}

#[tokio::test]
async fn test_duplicate_username_is_bad_request() {
    let app = TestApp::new().await;
    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(registration("asha", "123456789012")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(registration("asha", "999988887777")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn test_profile_whitelist() {
    let app = TestApp::new().await;
    let (_, token) = app.seed("asha", Role::Citizen, None).await;

    let (status, body) = app
        .patch("/api/users/profile", &token, json!({"location": "Ward 9", "phone": "98450"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], "Ward 9");

    let (status, body) = app
        .patch("/api/users/profile", &token, json!({"role": "admin"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2007);

    let (_, me) = app.get("/api/users/profile", &token).await;
    assert_eq!(me["role"], "citizen");
}
