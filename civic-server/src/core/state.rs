use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::services::accounts;

/// Server state, cloned into every handler
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | immutable settings |
/// | pool | SqlitePool | database pool |
/// | jwt_service | Arc<JwtService> | token issue and validation |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Open the database, apply migrations and seed the bootstrap admin
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_path).await?;
        let state = Self::with_pool(config.clone(), db.pool);

        if let Some(admin) = &config.bootstrap_admin {
            accounts::ensure_admin(&state.pool, admin).await?;
        }

        Ok(state)
    }

    /// Build state around an existing pool
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config,
            pool,
            jwt_service,
        }
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
