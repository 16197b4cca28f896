//! Shared types for the civic issue tracker
//!
//! Error codes, API envelopes, data models and client DTOs used by the
//! server and by anything talking to it over HTTP.

pub mod client;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
