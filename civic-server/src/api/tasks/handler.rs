//! Task API Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use shared::models::{Task, TaskCreate, TaskQuery, TaskReview, TaskStatusUpdate};

use crate::api::Json;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::tasks;
use crate::utils::AppResult;

/// GET /api/tasks - scoped to the caller
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<TaskQuery>,
) -> AppResult<Json<Vec<Task>>> {
    Ok(Json(tasks::list(&state.pool, &user, &query).await?))
}

/// GET /api/tasks/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Task>> {
    Ok(Json(tasks::get(&state.pool, &user, id).await?))
}

/// POST /api/tasks - assign a post to a worker
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<TaskCreate>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let task = tasks::create(&state.pool, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PATCH /api/tasks/{id}/status - worker progress
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<TaskStatusUpdate>,
) -> AppResult<Json<Task>> {
    Ok(Json(tasks::update_status(&state.pool, &user, id, payload).await?))
}

/// PATCH /api/tasks/{id}/review - official review
pub async fn review(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<TaskReview>,
) -> AppResult<Json<Task>> {
    Ok(Json(tasks::review(&state.pool, &user, id, payload).await?))
}
