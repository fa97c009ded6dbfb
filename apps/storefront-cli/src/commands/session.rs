//! # Session Commands
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Session Commands                                  │
//! │                                                                         │
//! │  status  ──► AuthContext::state()            ──► SessionDto             │
//! │  login   ──► AuthContext::login(user, pw)    ──► NavigationDto + state  │
//! │  signup  ──► AuthContext::signup(request)    ──► NavigationDto          │
//! │  logout  ──► AuthContext::logout()           ──► SessionDto             │
//! │                                                                         │
//! │  The caller decides what to do with the destination: this layer only   │
//! │  reports which route the transition implies.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use storefront_core::{AuthState, Destination, User};
use storefront_session::{AuthContext, SignupRequest};
use tracing::debug;

use crate::error::ApiError;

/// Session snapshot for output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub is_authenticated: bool,
    pub is_initialized: bool,
    pub user: Option<User>,
}

impl From<AuthState> for SessionDto {
    fn from(state: AuthState) -> Self {
        SessionDto {
            is_authenticated: state.is_authenticated,
            is_initialized: state.is_initialized,
            user: state.user,
        }
    }
}

/// Where a successful transition points the user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationDto {
    pub destination: Destination,
    pub path: &'static str,
    pub session: SessionDto,
}

impl NavigationDto {
    fn new(destination: Destination, state: AuthState) -> Self {
        NavigationDto {
            destination,
            path: destination.path(),
            session: state.into(),
        }
    }
}

/// Current session.
pub fn status(auth: &AuthContext) -> SessionDto {
    auth.state().into()
}

/// Logs in and reports the role's landing route.
pub async fn login(
    auth: &AuthContext,
    username: String,
    password: String,
) -> Result<NavigationDto, ApiError> {
    debug!(%username, "login command");
    let destination = auth.login(username, password).await?;
    Ok(NavigationDto::new(destination, auth.state()))
}

/// Creates an account. The session is not changed.
pub async fn signup(auth: &AuthContext, request: SignupRequest) -> Result<NavigationDto, ApiError> {
    debug!(username = %request.username, "signup command");
    let destination = auth.signup(request).await?;
    Ok(NavigationDto::new(destination, auth.state()))
}

/// Ends the session, whether or not one was active.
pub async fn logout(auth: &AuthContext) -> Result<SessionDto, ApiError> {
    debug!("logout command");
    Ok(auth.logout().await?.into())
}
