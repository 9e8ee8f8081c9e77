use cinemood_api::{
    api::{create_router, AppState},
    config::Config,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before logging so RUST_LOG from .env applies
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinemood_api=info,tower_http=info")),
        )
        .init();

    if config.openai_api_key.is_none() || config.tmdb_api_key.is_none() {
        tracing::warn!(
            openai_key_set = config.openai_api_key.is_some(),
            tmdb_key_set = config.tmdb_api_key.is_some(),
            "API keys missing, affected endpoints will return configuration errors"
        );
    }

    let addr = format!("{}:{}", config.host, config.port);

    // Initialize application state
    let state = AppState::from_config(config)?;

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
