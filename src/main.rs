use prospect_intel::api::{run_server, AppState};
use prospect_intel::config::AppConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    // Setup Logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Prospect Intelligence Engine...");

    // Load Configuration
    let config = AppConfig::load()?;
    info!(
        "Loaded Configuration (bind: {}, fetch timeout: {}ms, llm: {})",
        config.server.bind_addr,
        config.collector.fetch_timeout_ms,
        if config.llm_enabled() { "enabled" } else { "disabled" }
    );

    let state = AppState::from_config(config).await?;

    info!("Initializing API Server...");
    run_server(state).await?;

    Ok(())
}
