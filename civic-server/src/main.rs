use civic_server::{Config, Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. .env + logging
    setup_environment()?;

    tracing::info!("Civic server starting...");

    // 2. Configuration
    let config = Config::from_env()?;

    // 3. Database, migrations, bootstrap admin
    let state = ServerState::initialize(&config).await?;

    // 4. Serve until ctrl-c
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
