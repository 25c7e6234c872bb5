//! Error types for the console binary.

use crate::config::ConfigError;
use crate::session::SessionError;
use crate::telemetry::TelemetryError;
use pmexec_llm::GatewayError;

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
