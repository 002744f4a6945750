pub mod auth;
pub mod civil_time;
pub mod config;
pub mod fetch_error;
pub mod fetcher;
pub mod model;
pub mod monitor;
pub mod partition;
pub mod record_locator;
pub mod report;
pub mod severity;
pub mod stations;
