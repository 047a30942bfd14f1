use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    InvalidFilter { value: String, source: ParseError },
    AlreadyInstalled { reason: String },
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter { value, .. } => {
                write!(f, "APP_LOG_LEVEL '{}' is not a valid tracing filter", value)
            }
            TelemetryError::AlreadyInstalled { reason } => {
                write!(f, "a global log subscriber is already installed: {}", reason)
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled { .. } => None,
        }
    }
}

/// `RUST_LOG` wins over the configured level when it parses.
fn record_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => level_filter(&config.log_level),
    }
}

fn level_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(level).map_err(|source| TelemetryError::InvalidFilter {
        value: level.to_string(),
        source,
    })
}

/// Installs the global subscriber. Engine transitions log at `debug`, report
/// summaries at `info`. Output goes to stderr so rendered reports on stdout
/// can be piped.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(record_filter(config)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(|err| TelemetryError::AlreadyInstalled {
            reason: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_levels_and_per_module_directives() {
        assert!(level_filter("info").is_ok());
        assert!(level_filter("warn,prior_record::records=debug").is_ok());
    }

    #[test]
    fn rejects_unknown_level_names() {
        match level_filter("prior_record=loud") {
            Err(TelemetryError::InvalidFilter { value, .. }) => {
                assert_eq!(value, "prior_record=loud")
            }
            other => panic!("expected invalid filter, got {other:?}"),
        }
    }
}
