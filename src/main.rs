use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use deck_api_rust::auth::JwtIdentityProvider;
use deck_api_rust::services::InMemoryDeckService;
use deck_api_rust::{app, config, AppState};

#[derive(Parser)]
#[command(name = "deck-api-rust")]
#[command(about = "Deck API server")]
#[command(version)]
struct Args {
    #[arg(long, help = "Bind address (overrides DECK_API_HOST)")]
    host: Option<String>,

    #[arg(long, help = "Port (overrides DECK_API_PORT / PORT)")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, DECK_API_PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("deck_api_rust=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Deck API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; every authenticated request will fail with 500");
    }
    if deck_api_rust::is_development!() {
        tracing::info!("Development mode: CORS is permissive");
    }

    let state = AppState::new(
        Arc::new(JwtIdentityProvider::new(config.security.jwt_secret.clone())),
        Arc::new(InMemoryDeckService::new()),
        config,
    );
    let app = app(state, config);

    let host = args.host.unwrap_or_else(|| config.api.host.clone());
    let port = args.port.unwrap_or(config.api.port);
    let bind_addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Deck API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
