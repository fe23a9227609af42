// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use sensor_dashboard::application::dashboard_service::DashboardService;
use sensor_dashboard::infrastructure::build_reading_source;
use sensor_dashboard::infrastructure::config::load_dashboard_config;
use sensor_dashboard::presentation::app_state::AppState;
use sensor_dashboard::presentation::routes::build_router;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sensor_dashboard=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;
    let table_settings = config.table.to_settings()?;

    // Create reading source (infrastructure layer)
    let source = build_reading_source(&config.source)?;

    // Create service (application layer)
    let dashboard_service = DashboardService::new(source, table_settings, config.cache.capacity);

    let state = Arc::new(AppState {
        dashboard_service,
        theme: config.display.theme,
    });

    // Initial load runs in the background; views answer "loading" until it settles
    let loader = state.clone();
    let refresh = config.source.refresh_interval_secs.filter(|secs| *secs > 0);
    tokio::spawn(async move {
        if let Err(e) = loader.dashboard_service.reload().await {
            tracing::debug!("Initial load did not complete: {}", e);
        }

        if let Some(secs) = refresh {
            let mut interval = tokio::time::interval(Duration::from_secs(secs));
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Err(e) = loader.dashboard_service.reload().await {
                    tracing::debug!("Scheduled reload did not complete: {}", e);
                }
            }
        }
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid server.bind address {}", config.server.bind))?;
    tracing::info!("Starting sensor-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
