// HTTP request handlers
use crate::application::dashboard_service::DashboardStatus;
use crate::domain::category::{AggregateMode, CategoryAggregate};
use crate::domain::statistics::Statistics;
use crate::domain::table::{FilterOptions, TablePage};
use crate::domain::time_series::TimeSeries;
use crate::error::DashboardError;
use crate::infrastructure::config::ThemeMode;
use crate::presentation::app_state::AppState;
use crate::presentation::params::{FilterParams, TableParams};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::Loading => StatusCode::SERVICE_UNAVAILABLE,
            DashboardError::SourceFailed(_) => StatusCode::BAD_GATEWAY,
            DashboardError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, DashboardError>;

#[derive(Serialize)]
pub struct DashboardSettings {
    pub theme: ThemeMode,
    pub default_page_size: usize,
    pub page_sizes: Vec<usize>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn dashboard_status(State(state): State<Arc<AppState>>) -> Json<DashboardStatus> {
    Json(state.dashboard_service.status().await)
}

/// Reload readings from the source; the response reflects the settled state
pub async fn reload_dashboard(State(state): State<Arc<AppState>>) -> ApiResult<DashboardStatus> {
    Ok(Json(state.dashboard_service.reload().await?))
}

pub async fn dashboard_settings(State(state): State<Arc<AppState>>) -> Json<DashboardSettings> {
    let table = state.dashboard_service.table_settings();
    Json(DashboardSettings {
        theme: state.theme,
        default_page_size: table.default_page_size,
        page_sizes: table.page_sizes.clone(),
    })
}

pub async fn statistics(State(state): State<Arc<AppState>>) -> ApiResult<Statistics> {
    let stats = state.dashboard_service.statistics().await?;
    Ok(Json(stats.as_ref().clone()))
}

pub async fn sensor_distribution(State(state): State<Arc<AppState>>) -> ApiResult<Vec<CategoryAggregate>> {
    let counts = state.dashboard_service.category_aggregates(AggregateMode::Count).await?;
    Ok(Json(counts.as_ref().clone()))
}

pub async fn sensor_averages(State(state): State<Arc<AppState>>) -> ApiResult<Vec<CategoryAggregate>> {
    let averages = state.dashboard_service.category_aggregates(AggregateMode::Average).await?;
    Ok(Json(averages.as_ref().clone()))
}

pub async fn time_series(
    Query(params): Query<FilterParams>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<TimeSeries> {
    let dates = params.dates()?;
    let series = state
        .dashboard_service
        .time_series(params.categories(), dates)
        .await?;
    Ok(Json(series.as_ref().clone()))
}

pub async fn filter_options(State(state): State<Arc<AppState>>) -> ApiResult<FilterOptions> {
    let options = state.dashboard_service.filter_options().await?;
    Ok(Json(options.as_ref().clone()))
}

pub async fn table(
    Query(params): Query<TableParams>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<TablePage> {
    let default_page_size = state.dashboard_service.table_settings().default_page_size;
    let query = params.to_query(default_page_size)?;
    Ok(Json(state.dashboard_service.table(query).await?))
}
