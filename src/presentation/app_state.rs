// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::config::ThemeMode;

pub struct AppState {
    pub dashboard_service: DashboardService,
    pub theme: ThemeMode,
}
