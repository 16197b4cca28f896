//! User API
//!
//! | Path | Method | Operation |
//! |------|--------|-----------|
//! | /api/users/government | GET | ListOfficials |
//! | /api/users/profile | GET | ViewProfile |
//! | /api/users/profile | PATCH | UpdateProfile |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch},
};

use crate::auth::{Operation, require_operation};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/users/government",
            get(handler::list_officials)
                .route_layer(middleware::from_fn(require_operation(Operation::ListOfficials))),
        )
        .route(
            "/api/users/profile",
            get(handler::profile).route_layer(middleware::from_fn(require_operation(Operation::ViewProfile))),
        )
        .route(
            "/api/users/profile",
            patch(handler::update_profile)
                .route_layer(middleware::from_fn(require_operation(Operation::UpdateProfile))),
        )
}
