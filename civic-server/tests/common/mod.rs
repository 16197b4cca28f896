//! Shared harness: in-memory server, seeded users, request helpers

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use civic_server::auth::password::hash_password;
use civic_server::db::DbService;
use civic_server::db::repository::user;
use civic_server::{Config, ServerState, api};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use shared::models::{NewUser, Role, User};
use tower::ServiceExt;

pub const PASSWORD: &str = "password1";

pub struct TestApp {
    pub state: ServerState,
    pub app: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = DbService::in_memory().await.expect("in-memory database");
        let state = ServerState::with_pool(Config::for_tests(), db.pool);
        let app = api::build_app(state.clone());
        Self { state, app }
    }

    /// Store a user directly and return it with a bearer token
    pub async fn seed(&self, username: &str, role: Role, department: Option<&str>) -> (User, String) {
        let stored = user::create(
            &self.state.pool,
            NewUser {
                name: username.to_string(),
                username: username.to_string(),
                hash_pass: hash_password(PASSWORD).expect("hash"),
                role,
                department: department.map(String::from),
                designation: role.is_departmental().then(|| "Officer".to_string()),
                phone: None,
                permissions: vec![],
                verified: true,
                assigned_to: None,
                aadhaar_number: None,
                location: None,
            },
        )
        .await
        .expect("seed user");
        let token = self
            .state
            .jwt_service
            .generate_token(&stored)
            .expect("token");
        (stored, token)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(http::header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("response");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    /// File a post as `token` and return its id
    pub async fn file_post(&self, token: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/posts",
                token,
                serde_json::json!({
                    "title": "Overflowing drain",
                    "description": "Water on the road after every rain",
                    "category": "sanitation",
                    "location": "Ward 7, Main Street",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().expect("post id")
    }
}
