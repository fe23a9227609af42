// Domain layer - Readings and the pure views derived from them
pub mod category;
pub mod filter;
pub mod reading;
pub mod statistics;
pub mod table;
pub mod time_series;
