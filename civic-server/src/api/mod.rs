//! HTTP API
//!
//! Each resource module exposes `router()`; [`build_app`] merges them and
//! applies the cross-cutting layers.
//!
//! - [`health`] - liveness probe (public)
//! - [`auth`] - register, login, me
//! - [`posts`] - civic issues, upvotes, comments
//! - [`tasks`] - work orders
//! - [`workers`] - worker provisioning and directory
//! - [`users`] - profile and officials directory
//! - [`admin`] - official provisioning and system stats

pub mod admin;
pub mod auth;
pub mod health;
mod json;
pub mod posts;
pub mod tasks;
pub mod users;
pub mod workers;

pub use json::Json;

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

/// HTTP access log
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = std::time::Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        target: "http_access",
        "{} {} {} {}ms",
        method,
        uri,
        response.status(),
        started.elapsed().as_millis()
    );
    response
}

/// All routes, without state or layers
pub fn build_router() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(posts::router())
        .merge(tasks::router())
        .merge(workers::router())
        .merge(users::router())
        .merge(admin::router())
}

/// The complete application: routes, authentication, CORS, compression, access log
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // require_auth skips the public routes itself
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request))
}
