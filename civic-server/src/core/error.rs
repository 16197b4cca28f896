use thiserror::Error;

/// Startup and lifecycle errors
///
/// Request handling uses [`crate::AppError`]; these only surface from
/// `main` while the server boots or shuts down.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] shared::AppError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result alias for server lifecycle operations
pub type Result<T> = std::result::Result<T, ServerError>;
