//! Admin API Handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
};
use shared::client::SystemStats;
use shared::models::{OfficialCreate, User};

use crate::api::Json;
use crate::api::workers::DepartmentQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::{accounts, workers};
use crate::utils::AppResult;

/// POST /api/admin/officials
pub async fn create_official(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OfficialCreate>,
) -> AppResult<(StatusCode, Json<User>)> {
    let official = accounts::create_official(&state.pool, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(official)))
}

/// GET /api/admin/officials
pub async fn list_officials(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(accounts::list_officials(&state.pool).await?))
}

/// GET /api/admin/workers - every worker, or one department's
pub async fn list_workers(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<DepartmentQuery>,
) -> AppResult<Json<Vec<User>>> {
    let found = workers::list(&state.pool, &user, query.department.as_deref()).await?;
    Ok(Json(found))
}

/// GET /api/admin/stats
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<SystemStats>> {
    Ok(Json(accounts::system_stats(&state.pool).await?))
}
