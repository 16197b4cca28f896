//! Database Module
//!
//! Handles the SQLite connection pool and migrations

pub mod repository;

use crate::utils::AppError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

/// Path value selecting an ephemeral in-memory database
pub const MEMORY_PATH: &str = ":memory:";

/// Database service, owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database at `db_path` and apply migrations
    ///
    /// File databases run in WAL mode with foreign keys on. `:memory:` gets a
    /// single connection that is never recycled, since every new connection
    /// would see an empty database.
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let pool = if db_path == MEMORY_PATH {
            let options = SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
                .pragma("foreign_keys", "ON");

            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await
                .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?
        } else {
            let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
                .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .busy_timeout(Duration::from_millis(5000))
                .pragma("foreign_keys", "ON")
                .optimize_on_close(true, None);

            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await
                .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?
        };

        tracing::info!(path = %db_path, "Database connection established");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }

    /// Ephemeral database for tests
    pub async fn in_memory() -> Result<Self, AppError> {
        Self::new(MEMORY_PATH).await
    }
}
