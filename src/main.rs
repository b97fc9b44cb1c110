// src/main.rs

use freight_dashboard_api::{
    app,
    config::{DbConfig, ServerConfig},
    AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let db = DbConfig::from_env()?;
    let server = ServerConfig::from_env()?;
    info!(host = %db.host, port = db.port, database = %db.database, "database configured");

    let api = app(AppState::new(&db));

    let addr = server.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "dashboard API listening");
    info!("health check: http://127.0.0.1:{}/api/health", server.port);

    axum::serve(listener, api.into_make_service()).await?;
    Ok(())
}
