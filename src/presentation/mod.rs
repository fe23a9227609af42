// Presentation layer - HTTP API
pub mod app_state;
pub mod handlers;
pub mod params;
pub mod routes;
