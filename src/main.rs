//! gallon-server — Monthly water-gallon quota tracking service
//!
//! Long-running service that:
//! - Resolves employees by barcode tag or typed employee ID at the scan station
//! - Applies the lazy monthly quota reset and guarded withdrawals
//! - Provides an admin API for employee management
//! - Serves the withdrawal history report as CSV

mod api;
mod config;
mod db;
mod error;
mod models;
mod quota;
mod report;
mod state;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gallon_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting gallon-server (env: {})", config.environment);

    // Initialize application state (connects to PG and runs migrations)
    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("gallon-server HTTP listening on {http_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
