//! Admin API
//!
//! | Path | Method | Operation |
//! |------|--------|-----------|
//! | /api/admin/officials | POST, GET | ManageOfficials |
//! | /api/admin/workers | GET | ManageOfficials |
//! | /api/admin/stats | GET | ViewSystemStats |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{Operation, require_operation};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<ServerState> {
    let staff_routes = Router::new()
        .route("/officials", post(handler::create_official))
        .route("/officials", get(handler::list_officials))
        .route("/workers", get(handler::list_workers))
        .route_layer(middleware::from_fn(require_operation(Operation::ManageOfficials)));

    let stats_routes = Router::new()
        .route("/stats", get(handler::stats))
        .route_layer(middleware::from_fn(require_operation(Operation::ViewSystemStats)));

    staff_routes.merge(stats_routes)
}
