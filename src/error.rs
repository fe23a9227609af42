// Errors surfaced at the service and HTTP boundary
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("Readings are still loading")]
    Loading,

    #[error("Failed to load readings: {0}")]
    SourceFailed(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

pub type DashboardResult<T> = Result<T, DashboardError>;
