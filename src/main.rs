use tracing_subscriber::EnvFilter;

use xcyber_api::config::config;
use xcyber_api::database::DatabaseManager;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    tracing::info!("Starting xcyber API in {:?} mode", config.environment);
    if config.security.jwt_secret.is_empty() {
        if xcyber_api::is_production!() {
            tracing::error!("JWT_SECRET must be set in production");
            std::process::exit(1);
        }
        tracing::warn!("JWT_SECRET is not set; login and authenticated routes will fail");
    }

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", bind_addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("xcyber API listening on http://{}", bind_addr);

    if let Err(e) = axum::serve(listener, xcyber_api::app::router())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
    }

    DatabaseManager::close_all().await;
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
