//! Unified error types for LiqureMate.
//!
//! Error codes:
//! - BAAS_001-002: Remote backend errors
//! - DATA_001: Local dataset errors
//! - VALID_001: Validation errors

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Remote backend error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorCode {
    /// BAAS_001: Backend could not be reached
    Unreachable,
    /// BAAS_002: Backend answered with a non-success status
    Rejected,
}

impl BackendErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unreachable => "BAAS_001",
            Self::Rejected => "BAAS_002",
        }
    }
}

/// Unified error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The backend request never produced a response.
    #[error("[BAAS_001] backend request failed: {0}")]
    Backend(String),

    /// The backend responded with a non-success status.
    #[error("[BAAS_002] backend returned {status}: {body}")]
    BackendStatus { status: u16, body: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn backend_status(status: u16, body: impl Into<String>) -> Self {
        Self::BackendStatus {
            status,
            body: body.into(),
        }
    }

    pub fn csv(msg: impl Into<String>) -> Self {
        Self::Csv(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the failure came from the remote backend.
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::BackendStatus { .. })
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Backend(_) => 502,
            Self::BackendStatus { .. } => 502,
            Self::Io(_) => 500,
            Self::Serialization(_) => 400,
            Self::Csv(_) => 500,
            Self::Validation(_) => 400,
            Self::Config(_) => 500,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code if this is a coded error.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Backend(_) => Some(BackendErrorCode::Unreachable.code()),
            Self::BackendStatus { .. } => Some(BackendErrorCode::Rejected.code()),
            Self::Io(_) | Self::Csv(_) => Some("DATA_001"),
            Self::Validation(_) | Self::Serialization(_) => Some("VALID_001"),
            _ => None,
        }
    }
}
