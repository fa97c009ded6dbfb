//! # API Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront CLI                     │
//! │                                                                         │
//! │  storefront login alice --password ...                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │  Identity error? ─── SessionError::Auth ──────────┐             │  │
//! │  │         │                                          ▼             │  │
//! │  │  Store error?   ─── StoreError::Unavailable ──► ApiError ──────►│  │
//! │  │         │                                                        │  │
//! │  │  Success ─────────────────────────────────────► JSON on stdout  │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: {"code": "AUTH_FAILED", "message": "Login failed: ..."}       │
//! │  exit status 1                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use storefront_session::SessionError;
use storefront_store::StoreError;

/// Error printed when a command fails.
///
/// ```json
/// {
///   "code": "AUTH_FAILED",
///   "message": "Login failed: Invalid login (status 401)"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Login rejected or identity service unreachable
    AuthFailed,

    /// Signup rejected or identity service unreachable
    SignupFailed,

    /// Session store could not be opened, read or written
    StorageError,

    /// Invalid configuration
    ConfigError,

    /// Anything else
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

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// JSON form printed on stderr.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.to_string())
    }
}

/// Converts session errors to API errors.
impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let message = err.user_message();
        match err {
            SessionError::Auth(_) => ApiError::new(ErrorCode::AuthFailed, message),
            SessionError::Signup(_) => ApiError::new(ErrorCode::SignupFailed, message),
            SessionError::StorageRead(_) | SessionError::Persist(_) => {
                ApiError::new(ErrorCode::StorageError, message)
            }
            SessionError::Config(_)
            | SessionError::ConfigLoad(_)
            | SessionError::ConfigSave(_)
            | SessionError::HttpClient(_) => ApiError::new(ErrorCode::ConfigError, message),
            SessionError::Interrupted(e) => {
                tracing::error!("Session task interrupted: {}", e);
                ApiError::internal(message)
            }
        }
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConnectionFailed(e) => {
                tracing::error!("Session store connection failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Session store could not be opened")
            }
            StoreError::MigrationFailed(e) => {
                tracing::error!("Session store migration failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Session store migration failed")
            }
            StoreError::PoolExhausted => {
                ApiError::new(ErrorCode::StorageError, "Session store busy")
            }
            other => {
                tracing::error!("Session store error: {}", other);
                ApiError::new(ErrorCode::StorageError, "Session store operation failed")
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::internal(format!("Could not encode output: {err}"))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
