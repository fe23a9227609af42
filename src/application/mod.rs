// Application layer - Use cases over the reading source
pub mod dashboard_service;
pub mod reading_source;
pub mod view_cache;
