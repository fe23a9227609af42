// Sensor dashboard - Derived views over sensor reading sets
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;
