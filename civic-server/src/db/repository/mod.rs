//! Repository Module
//!
//! Free functions over SQLite, one module per table family. Single
//! statements take any executor (`&pool` or `&mut *tx`); multi-statement
//! helpers take a `&mut SqliteConnection`.

pub mod post;
pub mod task;
pub mod user;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("row".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                // "UNIQUE constraint failed: users.username" -> "users.username"
                let message = db_err.message();
                let column = message
                    .rsplit(": ")
                    .next()
                    .unwrap_or(message)
                    .to_string();
                RepoError::Duplicate(column)
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(err: serde_json::Error) -> Self {
        RepoError::Database(format!("JSON column encoding failed: {err}"))
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(what) => AppError::not_found(what),
            RepoError::Duplicate(column) => match column.as_str() {
                "users.username" => {
                    AppError::new(ErrorCode::UsernameExists).with_detail("field", column)
                }
                "users.aadhaar_number" => {
                    AppError::new(ErrorCode::AadhaarExists).with_detail("field", column)
                }
                _ => AppError::already_exists(column),
            },
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_duplicate_maps_to_bad_request() {
        let err: AppError = RepoError::Duplicate("users.username".into()).into();
        assert_eq!(err.code, ErrorCode::UsernameExists);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert!(err.message.contains("already exists"));

        let err: AppError = RepoError::Duplicate("post_upvotes.post_id".into()).into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
        assert_eq!(err.message, "post_upvotes.post_id already exists");
    }

    #[test]
    fn test_database_maps_to_internal() {
        let err: AppError = RepoError::Database("disk full".into()).into();
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
