// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardController;

pub struct AppState {
    pub controller: DashboardController,
}
