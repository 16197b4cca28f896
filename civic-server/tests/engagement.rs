mod common;

use common::TestApp;
use http::StatusCode;
use serde_json::json;
use shared::models::Role;

#[tokio::test]
async fn test_upvote_toggle_restores_state() {
    let app = TestApp::new().await;
    let (_, author) = app.seed("asha", Role::Citizen, None).await;
    let (voter, voter_token) = app.seed("meena", Role::Citizen, None).await;
    let post_id = app.file_post(&author).await;
    let uri = format!("/api/posts/{post_id}/upvote");

    let (status, first) = app.post(&uri, &voter_token, json!(null)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["upvoted"], true);
    assert_eq!(first["upvote_count"], 1);

    let (_, detail) = app.get(&format!("/api/posts/{post_id}"), &author).await;
    assert_eq!(detail["upvotes"], json!([voter.id]));

    let (_, second) = app.post(&uri, &voter_token, json!(null)).await;
    assert_eq!(second["upvoted"], false);
    assert_eq!(second["upvote_count"], 0);
    assert_eq!(second["engagement_score"], 0.0);
}

#[tokio::test]
async fn test_engagement_score_is_order_independent() {
    let app = TestApp::new().await;
    let (_, author) = app.seed("asha", Role::Citizen, None).await;
    let (_, other) = app.seed("meena", Role::Citizen, None).await;

    let a = app.file_post(&author).await;
    app.post(&format!("/api/posts/{a}/upvote"), &other, json!(null)).await;
    app.post(&format!("/api/posts/{a}/comments"), &other, json!({"text": "Same here"}))
        .await;

    let b = app.file_post(&author).await;
    app.post(&format!("/api/posts/{b}/comments"), &other, json!({"text": "Same here"}))
        .await;
    app.post(&format!("/api/posts/{b}/upvote"), &other, json!(null)).await;

    let (_, pa) = app.get(&format!("/api/posts/{a}"), &author).await;
    let (_, pb) = app.get(&format!("/api/posts/{b}"), &author).await;
    assert_eq!(pa["engagement_score"], 3.0);
    assert_eq!(pa["engagement_score"], pb["engagement_score"]);
}

#[tokio::test]
async fn test_empty_comment_is_rejected() {
    let app = TestApp::new().await;
    let (_, author) = app.seed("asha", Role::Citizen, None).await;
    let post_id = app.file_post(&author).await;

    let (status, _) = app
        .post(&format!("/api/posts/{post_id}/comments"), &author, json!({"text": ""}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, comment) = app
        .post(&format!("/api/posts/{post_id}/comments"), &author, json!({"text": "Please fix"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(comment["author_name"], "asha");
}

#[tokio::test]
async fn test_post_edit_whitelist() {
    let app = TestApp::new().await;
    let (_, author) = app.seed("asha", Role::Citizen, None).await;
    let (_, official) = app.seed("ravi", Role::Government, Some("roads")).await;
    let post_id = app.file_post(&author).await;
    let uri = format!("/api/posts/{post_id}");

    let (status, _) = app.patch(&uri, &author, json!({"status": "resolved"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.patch(&uri, &author, json!({"upvotes": [1, 2, 3]})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.patch(&uri, &official, json!({"title": "Renamed"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, post) = app.patch(&uri, &official, json!({"priority": "critical"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["priority"], "critical");

    let (status, post) = app
        .patch(&uri, &author, json!({"description": "Getting worse"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["description"], "Getting worse");
}
