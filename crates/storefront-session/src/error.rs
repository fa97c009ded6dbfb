//! # Session Error Types
//!
//! Error types for session operations.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Session Error Categories                          │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Identity       │  │   Storage       │  │     Configuration       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  AuthError      │  │  StorageRead    │  │  Config                 │ │
//! │  │  SignupError    │  │  Persist        │  │  ConfigLoad / Save      │ │
//! │  │                 │  │                 │  │  HttpClient             │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Interrupted: a detached login/signup/logout task never reported back. │
//! │                                                                         │
//! │  StorageRead is recovered inside initialize() and never surfaced.      │
//! │  AuthError / SignupError / Persist reach the caller of login/signup,   │
//! │  with state and persisted store left as they were.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storefront_store::StoreError;
use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Login failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The identity service answered with a non-success status.
    #[error("Invalid login (status {status})")]
    Rejected { status: u16 },

    /// The identity service could not be reached.
    #[error("Identity service unreachable: {0}")]
    Unreachable(String),

    /// A success response whose body could not be decoded.
    #[error("Invalid login response: {0}")]
    InvalidResponse(String),
}

/// Signup failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignupError {
    /// The identity service answered with a non-success status.
    #[error("Signup rejected (status {status})")]
    Rejected { status: u16 },

    /// The identity service could not be reached.
    #[error("Identity service unreachable: {0}")]
    Unreachable(String),
}

/// Session error type covering every failure the session layer reports.
#[derive(Debug, Error)]
pub enum SessionError {
    // =========================================================================
    // Identity Errors
    // =========================================================================
    /// Login rejected or identity service unreachable.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Signup rejected or identity service unreachable.
    #[error(transparent)]
    Signup(#[from] SignupError),

    // =========================================================================
    // Storage Errors
    // =========================================================================
    /// Persisted store unreadable during initialization.
    #[error("Session store unreadable: {0}")]
    StorageRead(#[source] StoreError),

    /// Session facts could not be written after a successful login.
    #[error("Could not save session: {0}")]
    Persist(#[source] StoreError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid session configuration.
    #[error("Invalid session configuration: {0}")]
    Config(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoad(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSave(String),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    // =========================================================================
    // Runtime Errors
    // =========================================================================
    /// A detached session task was torn down before reporting back.
    #[error("Session task interrupted: {0}")]
    Interrupted(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::ConfigLoad(err.to_string())
    }
}

impl From<toml::de::Error> for SessionError {
    fn from(err: toml::de::Error) -> Self {
        SessionError::ConfigLoad(err.to_string())
    }
}

impl From<toml::ser::Error> for SessionError {
    fn from(err: toml::ser::Error) -> Self {
        SessionError::ConfigSave(err.to_string())
    }
}

impl From<tokio::task::JoinError> for SessionError {
    fn from(err: tokio::task::JoinError) -> Self {
        SessionError::Interrupted(err.to_string())
    }
}

impl From<url::ParseError> for SessionError {
    fn from(err: url::ParseError) -> Self {
        SessionError::Config(format!("invalid identity service URL: {err}"))
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl SessionError {
    /// Message suitable for showing to the person at the keyboard.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Auth(e) => format!("Login failed: {e}"),
            SessionError::Persist(e) => format!("Login failed: could not save session ({e})"),
            SessionError::Signup(e) => format!("Signup failed: {e}"),
            other => other.to_string(),
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SessionError::Config(_)
                | SessionError::ConfigLoad(_)
                | SessionError::ConfigSave(_)
                | SessionError::HttpClient(_)
        )
    }

    /// Returns true if the identity service could not be reached.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            SessionError::Auth(AuthError::Unreachable(_))
                | SessionError::Signup(SignupError::Unreachable(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = SessionError::from(AuthError::Rejected { status: 401 });
        assert_eq!(err.user_message(), "Login failed: Invalid login (status 401)");

        let err = SessionError::from(SignupError::Rejected { status: 409 });
        assert_eq!(err.user_message(), "Signup failed: Signup rejected (status 409)");

        let err = SessionError::Persist(StoreError::Unavailable("closed".into()));
        assert!(err.user_message().starts_with("Login failed:"));
    }

    #[test]
    fn test_categories() {
        assert!(SessionError::Config("bad".into()).is_config_error());
        assert!(!SessionError::from(AuthError::Rejected { status: 401 }).is_config_error());

        assert!(SessionError::from(AuthError::Unreachable("refused".into())).is_unreachable());
        assert!(SessionError::from(SignupError::Unreachable("refused".into())).is_unreachable());
        assert!(!SessionError::from(AuthError::Rejected { status: 500 }).is_unreachable());
    }
}
