//! Post API
//!
//! | Path | Method | Operation |
//! |------|--------|-----------|
//! | /api/posts | GET | ListPosts |
//! | /api/posts | POST | CreatePost |
//! | /api/posts/stats/overview | GET | ViewPostStats |
//! | /api/posts/{id} | GET | ViewPost |
//! | /api/posts/{id} | PATCH | EditPost |
//! | /api/posts/{id}/status | PATCH | UpdatePostStatus |
//! | /api/posts/{id}/upvote | POST | UpvotePost |
//! | /api/posts/{id}/comments | POST | CommentOnPost |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::auth::{Operation, require_operation};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/posts", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route(
            "/",
            get(handler::list).route_layer(middleware::from_fn(require_operation(Operation::ListPosts))),
        )
        .route(
            "/{id}",
            get(handler::get_by_id).route_layer(middleware::from_fn(require_operation(Operation::ViewPost))),
        )
        .route(
            "/stats/overview",
            get(handler::stats).route_layer(middleware::from_fn(require_operation(Operation::ViewPostStats))),
        );

    let write_routes = Router::new()
        .route(
            "/",
            post(handler::create).route_layer(middleware::from_fn(require_operation(Operation::CreatePost))),
        )
        .route(
            "/{id}",
            patch(handler::update).route_layer(middleware::from_fn(require_operation(Operation::EditPost))),
        )
        .route(
            "/{id}/status",
            patch(handler::update_status)
                .route_layer(middleware::from_fn(require_operation(Operation::UpdatePostStatus))),
        );

    let engagement_routes = Router::new()
        .route(
            "/{id}/upvote",
            post(handler::upvote).route_layer(middleware::from_fn(require_operation(Operation::UpvotePost))),
        )
        .route(
            "/{id}/comments",
            post(handler::comment)
                .route_layer(middleware::from_fn(require_operation(Operation::CommentOnPost))),
        );

    read_routes.merge(write_routes).merge(engagement_routes)
}
