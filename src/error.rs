use crate::config::ConfigError;
use crate::records::{ImportError, ScoringError};
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Import(ImportError),
    Scoring(ScoringError),
    Serialize(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Scoring(err) => write!(f, "record scoring error: {}", err),
            AppError::Serialize(err) => write!(f, "could not serialize report: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Scoring(err) => Some(err),
            AppError::Serialize(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ImportError> for AppError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<ScoringError> for AppError {
    fn from(value: ScoringError) -> Self {
        Self::Scoring(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}
