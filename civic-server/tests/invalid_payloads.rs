mod common;

use common::TestApp;
use http::{Method, StatusCode};
use serde_json::json;
use shared::models::Role;

#[tokio::test]
async fn test_unknown_post_status_is_bad_request() {
    let app = TestApp::new().await;
    let (_, citizen) = app.seed("asha", Role::Citizen, None).await;
    let (_, official) = app.seed("ravi", Role::Government, Some("roads")).await;
    let post_id = app.file_post(&citizen).await;

    let (status, body) = app
        .patch(
            &format!("/api/posts/{post_id}/status"),
            &official,
            json!({"status": "done"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    assert!(body["message"].as_str().is_some_and(|m| m.contains("status")), "{body}");

    let (_, post) = app.get(&format!("/api/posts/{post_id}"), &citizen).await;
    assert_eq!(post["status"], "pending");
}

#[tokio::test]
async fn test_unknown_category_is_bad_request() {
    let app = TestApp::new().await;
    let (_, citizen) = app.seed("asha", Role::Citizen, None).await;

    let (status, body) = app
        .post(
            "/api/posts",
            &citizen,
            json!({
                "title": "Broken lamp",
                "description": "Dark street at night",
                "category": "bogus",
                "location": "Ward 2",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
}

#[tokio::test]
async fn test_unknown_role_on_register_is_bad_request() {
    let app = TestApp::new().await;
    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Asha Rao",
                "username": "asha",
                "password": "secret12",
                "role": "government_official",
                "aadhaar_number": "123456789012",
                "location": "Ward 4",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
}

#[tokio::test]
async fn test_body_without_json_content_type_is_bad_request() {
    let app = TestApp::new().await;
    let (_, citizen) = app.seed("asha", Role::Citizen, None).await;

    let (status, body) = app
        .request(Method::POST, "/api/posts", Some(citizen.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
}
