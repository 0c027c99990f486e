pub mod config;
pub mod error;
pub mod kommun;
pub mod telemetry;
