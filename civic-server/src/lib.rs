//! Civic Server - municipal issue tracking backend
//!
//! Citizens file posts, officials turn them into tasks for field workers,
//! workers report progress and officials review and close the work.
//!
//! # Modules
//!
//! ```text
//! civic-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT, extractor, middleware, permission matrix
//! ├── db/            # SQLite pool and repositories
//! ├── services/      # post / task / account workflows
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Audit log helper - records workflow events under the `audit` target
///
/// ```ignore
/// audit_log!(user.id, "task_closed", format!("task:{}", task.id));
/// audit_log!(user.id, "worker_created", format!("user:{}", id), "department=roads");
/// ```
#[macro_export]
macro_rules! audit_log {
    ($user_id:expr, $action:expr, $resource:expr) => {
        tracing::info!(
            target: "audit",
            user_id = $user_id,
            action = $action,
            resource = %$resource,
            "AUDIT"
        );
    };
    ($user_id:expr, $action:expr, $resource:expr, $details:expr) => {
        tracing::info!(
            target: "audit",
            user_id = $user_id,
            action = $action,
            resource = %$resource,
            details = %$details,
            "AUDIT"
        );
    };
}

/// Security log helper - records authentication and authorization failures
///
/// The first argument is a [`tracing::Level`] name. Field values are
/// recorded with their `Display` form.
///
/// ```ignore
/// security_log!(WARN, "permission_denied", user_id = user.id, role = user.role);
/// ```
#[macro_export]
macro_rules! security_log {
    ($level:ident, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::event!(
            target: "security",
            tracing::Level::$level,
            event = $event
            $(, $key = %$value)*
        );
    };
}

/// Load `.env` and initialize logging from the environment
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let json = std::env::var("LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);
    let log_dir = std::env::var("LOG_DIR").ok();

    init_logger_with_file(&level, json, log_dir.as_deref())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    #[derive(Clone, Default)]
    struct Recorded(Arc<Mutex<Vec<(String, Level)>>>);

    impl<S: Subscriber> Layer<S> for Recorded {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let meta = event.metadata();
            self.0
                .lock()
                .unwrap()
                .push((meta.target().to_string(), *meta.level()));
        }
    }

    #[test]
    fn test_security_log_emits_at_given_level() {
        let recorded = Recorded::default();
        let subscriber = tracing_subscriber::registry().with(recorded.clone());
        tracing::subscriber::with_default(subscriber, || {
            security_log!(INFO, "session_started", user_id = 7);
            security_log!(WARN, "permission_denied", user_id = 7, role = "citizen");
        });

        let seen = recorded.0.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                ("security".to_string(), Level::INFO),
                ("security".to_string(), Level::WARN),
            ]
        );
    }
}
