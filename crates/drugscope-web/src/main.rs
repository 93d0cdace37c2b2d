//! drugscope server
//!
//! Run with: cargo run -p drugscope-web

use std::net::SocketAddr;
use std::sync::Arc;

use drugscope_db::{Database, HistoryRepository};
use drugscope_web::{config::Config, router::build_router, state::AppState};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting drugscope server...");

    let db = Arc::new(Database::open(&config.database.url, config.database.max_connections).await?);
    db.initialize().await?;
    let history = Arc::new(HistoryRepository::new(db.clone()));

    let state = AppState::from_config(&config, history)?;
    if state.orchestrator.backend_available().await {
        info!(url = %config.prediction.base_url, "Prediction backend reachable");
    } else {
        warn!(
            url = %config.prediction.base_url,
            "Prediction backend not reachable; analyses will return 503 until it is"
        );
    }

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
