//! Request/response types shared between server and API clients

use serde::{Deserialize, Serialize};

use crate::models::User;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token + user returned by login and registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// =============================================================================
// Admin API DTOs
// =============================================================================

/// System-wide counters for the admin dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemStats {
    pub users: crate::models::RoleCounts,
    pub total_posts: i64,
    pub resolved_posts: i64,
    pub total_tasks: i64,
    pub open_tasks: i64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: i64,
}
