//! Worker API Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{User, WorkerCreate};

use crate::api::Json;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::workers;
use crate::utils::AppResult;

/// `?department=` filter, honoured for admins only
#[derive(Debug, Default, Deserialize)]
pub struct DepartmentQuery {
    pub department: Option<String>,
}

/// GET /api/workers
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<DepartmentQuery>,
) -> AppResult<Json<Vec<User>>> {
    let found = workers::list(&state.pool, &user, query.department.as_deref()).await?;
    Ok(Json(found))
}

/// GET /api/workers/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    Ok(Json(workers::get(&state.pool, &user, id).await?))
}

/// POST /api/workers
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<WorkerCreate>,
) -> AppResult<(StatusCode, Json<User>)> {
    let worker = workers::create(&state.pool, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(worker)))
}
