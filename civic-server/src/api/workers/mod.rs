//! Worker API

mod handler;

pub(crate) use handler::DepartmentQuery;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{Operation, require_operation};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/workers", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route(
            "/",
            get(handler::list).route_layer(middleware::from_fn(require_operation(Operation::ListWorkers))),
        )
        .route(
            "/{id}",
            get(handler::get_by_id).route_layer(middleware::from_fn(require_operation(Operation::ViewWorker))),
        );

    let manage_routes = Router::new().route(
        "/",
        post(handler::create).route_layer(middleware::from_fn(require_operation(Operation::CreateWorker))),
    );

    read_routes.merge(manage_routes)
}
