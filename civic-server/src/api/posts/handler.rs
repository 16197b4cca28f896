//! Post API Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::{Map, Value};
use shared::models::{
    CommentCreate, Post, PostComment, PostCreate, PostDetail, PostQuery, PostStats,
    PostStatusUpdate, UpvoteResult,
};

use crate::api::Json;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::posts;
use crate::utils::AppResult;

/// GET /api/posts - filtered listing, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PostQuery>,
) -> AppResult<Json<Vec<Post>>> {
    Ok(Json(posts::list(&state.pool, &query).await?))
}

/// GET /api/posts/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PostDetail>> {
    Ok(Json(posts::get(&state.pool, id).await?))
}

/// POST /api/posts
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<PostCreate>,
) -> AppResult<(StatusCode, Json<Post>)> {
    let post = posts::create(&state.pool, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// PATCH /api/posts/{id} - whitelisted field edit
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<Map<String, Value>>,
) -> AppResult<Json<Post>> {
    Ok(Json(posts::edit(&state.pool, &user, id, body).await?))
}

/// PATCH /api/posts/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<PostStatusUpdate>,
) -> AppResult<Json<Post>> {
    Ok(Json(posts::update_status(&state.pool, &user, id, payload).await?))
}

/// POST /api/posts/{id}/upvote - toggle
pub async fn upvote(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<UpvoteResult>> {
    Ok(Json(posts::toggle_upvote(&state.pool, &user, id).await?))
}

/// POST /api/posts/{id}/comments
pub async fn comment(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CommentCreate>,
) -> AppResult<(StatusCode, Json<PostComment>)> {
    let comment = posts::add_comment(&state.pool, &user, id, payload).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/posts/stats/overview
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<PostStats>> {
    Ok(Json(posts::stats(&state.pool).await?))
}
