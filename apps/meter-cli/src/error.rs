//! # Error Types
//!
//! Errors surfaced by the host.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in meter-cli                              │
//! │                                                                         │
//! │  Startup                         Per command                            │
//! │  ───────                         ───────────                            │
//! │                                                                         │
//! │  ConfigState::from_env(tariff)   kw_to_money(request)                   │
//! │         │                               │                               │
//! │         ▼                               ▼                               │
//! │  ConfigError ──► stderr,         CoreError ──► ApiError { code, msg }   │
//! │                  exit 2                               │                 │
//! │                                                       ▼                 │
//! │                                         stderr (text) or stdout (json)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use meter_core::CoreError;

// =============================================================================
// Config Error
// =============================================================================

/// Failures while building [`ConfigState`](crate::state::ConfigState).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The tariff file could not be read.
    #[error("Failed to read tariff file {path}: {source}")]
    TariffRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tariff file was read but is not a valid table.
    #[error("Invalid tariff file {path}: {source}")]
    TariffInvalid {
        path: PathBuf,
        #[source]
        source: CoreError,
    },

    /// An environment variable holds a value that does not parse.
    #[error("{key} has invalid value '{value}': {reason}")]
    InvalidEnv {
        key: String,
        value: String,
        reason: String,
    },
}

// =============================================================================
// API Error
// =============================================================================

/// Error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INVALID_READING",
///   "message": "Current reading must be greater than previous reading (previous 500, current 400)"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Category name not recognized
    UnknownCategory,

    /// Units or amount not positive and finite
    InvalidQuantity,

    /// Current reading not greater than previous reading
    InvalidReading,

    /// Tariff table failed validation
    InvalidTariff,

    /// Input validation failed
    ValidationError,

    /// Unparseable command input (session mode)
    BadRequest,

    /// Response could not be serialized
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts serialization failures to API errors.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Failed to serialize response: {}", err);
        ApiError::internal("Failed to serialize response")
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::UnknownCategory(_) => ErrorCode::UnknownCategory,
            CoreError::InvalidQuantity { .. } => ErrorCode::InvalidQuantity,
            CoreError::ReadingNotIncreasing { .. } => ErrorCode::InvalidReading,
            CoreError::InvalidTariff { .. } => ErrorCode::InvalidTariff,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================
