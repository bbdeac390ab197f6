use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;
use plotpad_runner::SessionManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    info!(
        "Starting Plotpad server on port {} (interpreter: {}, timeout: {}s)",
        config.port,
        config.runner.interpreter.display(),
        config.runner.timeout.as_secs()
    );

    // Permissive CORS unless an explicit origin is configured
    let cors = match &config.cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<axum::http::HeaderValue>()?)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any),
    };

    let manager = Arc::new(SessionManager::new(config.runner));
    let app = plotpad_api::create_router(manager)
        .layer(cors)
        .layer(DefaultBodyLimit::max(config.max_body_bytes));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
