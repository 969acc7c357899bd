//! Error types shared by all toolbox services.

use serde::Serialize;
use thiserror::Error;

/// Toolbox error type.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum ToolboxError {
    /// Invalid tool input.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Name is not part of a MaStR code table.
    #[error("Unknown filter value: {0}")]
    UnknownFilterValue(String),

    /// Request exceeded its deadline.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Connection, DNS or socket failure.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Non-2xx HTTP response. `body` is already truncated for logging.
    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16, body: String },

    /// Malformed response payload.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A well-formed reply that has to be rejected (e.g. NTP kiss-of-death).
    #[error("Protocol error: {0}")]
    ProtocolError(String),
}

impl ToolboxError {
    /// Whether the error was caused by the caller's input rather than the remote side.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::UnknownFilterValue(_)
        )
    }
}

/// Result alias for toolbox operations.
pub type ToolboxResult<T> = std::result::Result<T, ToolboxError>;
