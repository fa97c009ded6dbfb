//! # Auth Context
//!
//! The handle the rest of the application holds. Cloning is cheap and every
//! clone talks to the same [`SessionController`].
//!
//! ```text
//!   order screen ──┐
//!   payment view ──┼──► AuthContext ──► SessionController ──► AuthState
//!   header bar   ──┘    (Clone)         (one per app)          (watch)
//! ```
//!
//! There is no global instance: the host builds one at startup and passes
//! it to whatever needs it.
//!
//! `login`, `signup` and `logout` run on a detached task. Dropping the
//! returned future does not cancel the operation; its outcome is still
//! committed and published to subscribers.

use std::sync::Arc;
use storefront_core::{AuthState, Destination, User};
use storefront_store::PersistedStore;
use tokio::sync::watch;

use crate::controller::SessionController;
use crate::error::SessionResult;
use crate::service::{AuthService, Credentials, SignupRequest};

/// Shared handle to the session.
#[derive(Debug, Clone)]
pub struct AuthContext {
    controller: Arc<SessionController>,
}

impl AuthContext {
    /// Builds a fresh controller over `store` and `service`.
    pub fn new(store: Arc<dyn PersistedStore>, service: Arc<dyn AuthService>) -> Self {
        Self::from_controller(Arc::new(SessionController::new(store, service)))
    }

    /// Wraps an existing controller, sharing its state.
    pub fn from_controller(controller: Arc<SessionController>) -> Self {
        AuthContext { controller }
    }

    /// Restores the persisted session. Await this before showing anything
    /// that depends on who is logged in.
    pub async fn initialize(&self) -> AuthState {
        self.controller.initialize().await
    }

    /// Read-only snapshot of the current state.
    pub fn state(&self) -> AuthState {
        self.controller.state()
    }

    /// The logged-in user, if any.
    pub fn user(&self) -> Option<User> {
        self.controller.state().user
    }

    /// Whether a user is logged in.
    pub fn is_authenticated(&self) -> bool {
        self.controller.state().is_authenticated
    }

    /// Change feed of published states.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.controller.subscribe()
    }

    /// Logs in and returns the landing route for the user's role. The
    /// login still commits if the caller stops waiting.
    pub async fn login(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> SessionResult<Destination> {
        let controller = self.controller.clone();
        let credentials = Credentials::new(username, password);
        tokio::spawn(async move { controller.login(&credentials).await }).await?
    }

    /// Creates an account. Never changes the session.
    pub async fn signup(&self, request: SignupRequest) -> SessionResult<Destination> {
        let controller = self.controller.clone();
        tokio::spawn(async move { controller.signup(&request).await }).await?
    }

    /// Ends the session, even if the store cannot be cleared.
    pub async fn logout(&self) -> SessionResult<AuthState> {
        let controller = self.controller.clone();
        Ok(tokio::spawn(async move { controller.logout().await }).await?)
    }
}
