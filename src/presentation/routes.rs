// Router wiring
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    dashboard_settings, dashboard_status, filter_options, health_check, reload_dashboard, sensor_averages,
    sensor_distribution, statistics, table, time_series,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard/status", get(dashboard_status))
        .route("/dashboard/reload", post(reload_dashboard))
        .route("/dashboard/settings", get(dashboard_settings))
        .route("/dashboard/statistics", get(statistics))
        .route("/dashboard/charts/distribution", get(sensor_distribution))
        .route("/dashboard/charts/averages", get(sensor_averages))
        .route("/dashboard/charts/time-series", get(time_series))
        .route("/dashboard/filters", get(filter_options))
        .route("/dashboard/table", get(table))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
