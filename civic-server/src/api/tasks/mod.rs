//! Task API
//!
//! | Path | Method | Operation |
//! |------|--------|-----------|
//! | /api/tasks | GET | ListTasks |
//! | /api/tasks | POST | CreateTask |
//! | /api/tasks/{id} | GET | ViewTask |
//! | /api/tasks/{id}/status | PATCH | UpdateTaskStatus |
//! | /api/tasks/{id}/review | PATCH | ReviewTask |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::auth::{Operation, require_operation};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tasks", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route(
            "/",
            get(handler::list).route_layer(middleware::from_fn(require_operation(Operation::ListTasks))),
        )
        .route(
            "/{id}",
            get(handler::get_by_id).route_layer(middleware::from_fn(require_operation(Operation::ViewTask))),
        );

    let official_routes = Router::new()
        .route(
            "/",
            post(handler::create).route_layer(middleware::from_fn(require_operation(Operation::CreateTask))),
        )
        .route(
            "/{id}/review",
            patch(handler::review).route_layer(middleware::from_fn(require_operation(Operation::ReviewTask))),
        );

    let worker_routes = Router::new().route(
        "/{id}/status",
        patch(handler::update_status)
            .route_layer(middleware::from_fn(require_operation(Operation::UpdateTaskStatus))),
    );

    read_routes.merge(official_routes).merge(worker_routes)
}
