//! # HTTP Identity Client
//!
//! [`AuthService`] over the identity service's JSON API.
//!
//! ## Wire Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Identity Service Endpoints                         │
//! │                                                                         │
//! │  POST {base}/auth/login                                                │
//! │    → {"username": "...", "password": "..."}                            │
//! │    ← 2xx {"user": {"username": "...", "role": "...",                   │
//! │                    "employeeid": "42" | 42 | null}}                    │
//! │    ← anything else: AuthError::Rejected                                │
//! │                                                                         │
//! │  POST {base}/auth/signup                                               │
//! │    → {"username", "password", "email", "phonenumber", "address"}       │
//! │    ← 2xx: ok, body ignored                                             │
//! │    ← anything else: SignupError::Rejected                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use storefront_core::{Role, User};
use tracing::{debug, warn};
use url::Url;

use crate::config::IdentitySettings;
use crate::error::{AuthError, SessionError, SessionResult, SignupError};
use crate::service::{AuthService, Credentials, SignupRequest};

const LOGIN_PATH: &str = "auth/login";
const SIGNUP_PATH: &str = "auth/signup";

// =============================================================================
// CLIENT
// =============================================================================

/// reqwest-backed identity client.
#[derive(Debug, Clone)]
pub struct HttpAuthService {
    http: reqwest::Client,
    login_url: Url,
    signup_url: Url,
}

impl HttpAuthService {
    /// Builds a client for the service described by `settings`.
    pub fn new(settings: &IdentitySettings) -> SessionResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .connect_timeout(settings.connect_timeout())
            .build()
            .map_err(|e| SessionError::HttpClient(e.to_string()))?;

        let base = base_url(&settings.base_url)?;
        Ok(HttpAuthService {
            http,
            login_url: base.join(LOGIN_PATH)?,
            signup_url: base.join(SIGNUP_PATH)?,
        })
    }

    pub fn login_url(&self) -> &Url {
        &self.login_url
    }

    pub fn signup_url(&self) -> &Url {
        &self.signup_url
    }
}

/// Parses `raw` and makes sure the path ends in `/` so relative joins
/// append rather than replace the last segment.
fn base_url(raw: &str) -> SessionResult<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        debug!(username = %credentials.username, url = %self.login_url, "Sending login request");

        let response = self
            .http
            .post(self.login_url.clone())
            .json(credentials)
            .send()
            .await
            .map_err(|e| AuthError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Login rejected by identity service");
            return Err(AuthError::Rejected {
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Unreachable(e.to_string()))?;

        parse_login_response(&text)
    }

    async fn signup(&self, request: &SignupRequest) -> Result<(), SignupError> {
        debug!(username = %request.username, url = %self.signup_url, "Sending signup request");

        let response = self
            .http
            .post(self.signup_url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| SignupError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Signup rejected by identity service");
            return Err(SignupError::Rejected {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
struct LoginResponse {
    user: WireUser,
}

#[derive(Deserialize)]
struct WireUser {
    username: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    employeeid: Option<serde_json::Value>,
}

impl WireUser {
    fn into_user(self) -> User {
        let role = self.role.as_deref().map(Role::from).unwrap_or_default();
        let employee_id = match self.employeeid {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        User {
            username: self.username,
            role,
            employee_id,
        }
    }
}

/// Decodes a successful `/auth/login` body.
pub fn parse_login_response(body: &str) -> Result<User, AuthError> {
    let response: LoginResponse =
        serde_json::from_str(body).map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
    Ok(response.user.into_user())
}
