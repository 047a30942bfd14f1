pub mod config;
pub mod error;
pub mod records;
pub mod telemetry;
