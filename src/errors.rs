// Error types for promtrack
// Failures of the instrumentation layer itself. Errors of wrapped handlers
// and dependency calls are never converted into these.
//
// Numan Thabit 2025 Nov

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("metric registration error: {0}")]
    Registration(#[source] prometheus::Error),
    #[error("metrics encode error: {0}")]
    Encode(String),
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("http server stopped: {0}")]
    Server(String),
    #[error("invalid listen address: {0}")]
    InvalidListenAddress(String),
}
