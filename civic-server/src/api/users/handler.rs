//! User API Handlers

use axum::extract::State;
use serde_json::{Map, Value};
use shared::models::User;

use crate::api::Json;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::accounts;
use crate::utils::AppResult;

/// GET /api/users/government - officials directory
pub async fn list_officials(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(accounts::list_officials(&state.pool).await?))
}

/// GET /api/users/profile
pub async fn profile(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<User>> {
    Ok(Json(accounts::profile(&state.pool, &user).await?))
}

/// PATCH /api/users/profile - only the editable profile fields
pub async fn update_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(body): Json<Map<String, Value>>,
) -> AppResult<Json<User>> {
    Ok(Json(accounts::update_profile(&state.pool, &user, body).await?))
}
