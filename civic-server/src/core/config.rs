use crate::auth::JwtConfig;
use crate::core::{Result, ServerError};

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | ENVIRONMENT | development | development, staging or production |
/// | HTTP_PORT | 5000 | HTTP listen port |
/// | DATABASE_PATH | civic.db | SQLite file (`:memory:` for an ephemeral database) |
/// | JWT_SECRET | generated in development | token signing secret, at least 32 chars |
/// | JWT_EXPIRATION_MINUTES | 10080 | token lifetime |
/// | JWT_ISSUER / JWT_AUDIENCE | civic-server / civic-clients | token claims |
/// | ADMIN_USERNAME / ADMIN_PASSWORD | unset | bootstrap administrator account |
/// | ADMIN_NAME | Administrator | display name of the bootstrap account |
///
/// # Example
///
/// ```ignore
/// HTTP_PORT=8080 DATABASE_PATH=/data/civic.db cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// SQLite database path
    pub database_path: String,
    /// JWT settings
    pub jwt: JwtConfig,
    /// development | staging | production
    pub environment: String,
    /// Administrator created at startup when missing
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Credentials of the administrator seeded at startup
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub name: String,
    pub username: String,
    pub password: String,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Fails when the JWT secret is missing or too short outside development.
    pub fn from_env() -> Result<Self> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let jwt = JwtConfig::from_env(environment == "development")
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let bootstrap_admin = match (
            std::env::var("ADMIN_USERNAME"),
            std::env::var("ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) => Some(BootstrapAdmin {
                name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".into()),
                username,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "civic.db".into()),
            jwt,
            environment,
            bootstrap_admin,
        })
    }

    /// In-memory database and a fixed secret, for tests
    pub fn for_tests() -> Self {
        Self {
            http_port: 0,
            database_path: crate::db::MEMORY_PATH.into(),
            jwt: JwtConfig {
                secret: "test-secret-key-that-is-at-least-32-chars".into(),
                expiration_minutes: 60,
                issuer: "civic-server".into(),
                audience: "civic-clients".into(),
            },
            environment: "test".into(),
            bootstrap_admin: None,
        }
    }

    /// Whether this is a production deployment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether this is a development deployment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
