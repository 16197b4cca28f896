//! Authentication Handlers

use axum::{extract::State, http::StatusCode};
use shared::client::{AuthResponse, LoginRequest};
use shared::models::{RegisterRequest, User};

use crate::api::Json;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::accounts;
use crate::utils::AppResult;

/// POST /api/auth/register - citizen self-registration
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let response = accounts::register(&state.pool, &state.jwt_service, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = accounts::login(&state.pool, &state.jwt_service, req).await?;
    Ok(Json(response))
}

/// GET /api/auth/me
pub async fn me(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<User>> {
    Ok(Json(accounts::profile(&state.pool, &user).await?))
}
