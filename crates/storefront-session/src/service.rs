//! # Auth Service
//!
//! The seam between the session layer and the remote identity service.
//! [`SessionController`](crate::SessionController) only sees this trait;
//! [`HttpAuthService`](crate::HttpAuthService) is the production
//! implementation and tests substitute scripted ones.
//!
//! Both operations are single-shot. Nothing here retries.

use async_trait::async_trait;
use serde::Serialize;
use storefront_core::User;

use crate::error::{AuthError, SignupError};

// =============================================================================
// Request Types
// =============================================================================

/// Login credentials. Serializes to the `/auth/login` request body.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// New-account fields. Serializes to the `/auth/signup` request body.
#[derive(Clone, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(rename = "phonenumber")]
    pub phone_number: String,
    pub address: String,
}

impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .field("address", &self.address)
            .finish()
    }
}

// =============================================================================
// AuthService Trait
// =============================================================================

/// Remote identity operations.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchanges credentials for the user's identity facts.
    async fn login(&self, credentials: &Credentials) -> Result<User, AuthError>;

    /// Registers a new account. Does not establish a session.
    async fn signup(&self, request: &SignupRequest) -> Result<(), SignupError>;
}
