//! Server Implementation
//!
//! HTTP server startup and graceful shutdown

use std::net::SocketAddr;
use std::time::Duration;

use crate::api;
use crate::core::{Config, Result, ServerState};

/// Connections get this long to finish after ctrl-c
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(&self) -> Result<()> {
        let app = api::build_app(self.state.clone());
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));

        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
            shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        });

        tracing::info!(%addr, environment = %self.config.environment, "Civic server starting");

        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}
