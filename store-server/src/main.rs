use store_server::{Config, Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (dotenv, work dir, logging)
    setup_environment()?;

    tracing::info!("Store server starting...");

    // 2. Configuration
    let config = Config::from_env();

    // 3. Server state (database, payment gateway, checkout services)
    let state = ServerState::initialize(&config).await;

    // 4. HTTP server (run() starts the background tasks)
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
