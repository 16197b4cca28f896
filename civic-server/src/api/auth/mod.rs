//! Authentication Routes
//!
//! - /api/auth/register, /api/auth/login: public
//! - /api/auth/me: any authenticated role

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::{Operation, require_operation};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/register", post(handler::register))
        .route("/api/auth/login", post(handler::login))
        .route(
            "/api/auth/me",
            get(handler::me).route_layer(middleware::from_fn(require_operation(Operation::ViewProfile))),
        )
}
