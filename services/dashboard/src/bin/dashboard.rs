//! services/dashboard/src/bin/dashboard.rs

use dashboard_lib::{
    app::{run_console, AppState},
    config::Config,
    error::DashboardError,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), DashboardError> {
    // --- 1. Load Configuration & Set Up Logging ---
    // stdout carries the event stream, so logs go to stderr.
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Starting dashboard...");

    // --- 2. Build the Shared AppState ---
    let app_state = Arc::new(AppState::from_config(config));

    // --- 3. Run the Console Session ---
    run_console(app_state, tokio::io::stdin(), tokio::io::stdout()).await?;
    info!("Dashboard stopped.");
    Ok(())
}
