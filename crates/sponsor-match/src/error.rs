use crate::config::ConfigError;
use crate::telemetry::TelemetryError;

/// Failure raised while bootstrapping the service or running a CLI command.
/// Request-path failures never reach this type; the match router maps
/// `MatchServiceError` to HTTP responses directly.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
}
