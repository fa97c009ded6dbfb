//! # Session Controller
//!
//! The single writer of [`AuthState`]. Every transition goes through here:
//! network call first, then the persisted store, then one dispatch into
//! [`reduce`].
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Operations                               │
//! │                                                                         │
//! │  initialize()  (run once)                                              │
//! │     store.get(username), store.get(role)                               │
//! │        both present ─► Initialize { authenticated, user }              │
//! │        missing/error ─► Initialize { anonymous }                       │
//! │                                                                         │
//! │  login(credentials)                                                    │
//! │     service.login ──err──► AuthError (nothing touched)                 │
//! │        │ ok                                                             │
//! │        ▼                                                                │
//! │     ┌──────────── commit lock ────────────┐                            │
//! │     │ store.set_many(username, role, id)  │──err──► restore, Persist   │
//! │     │ dispatch LoginSuccess { user }      │                            │
//! │     └─────────────────────────────────────┘                            │
//! │        ▼                                                                │
//! │     redirect_for_role(user.role)                                       │
//! │                                                                         │
//! │  signup(request)                                                       │
//! │     service.signup ──► Destination::Login, state untouched             │
//! │                                                                         │
//! │  logout()                                                              │
//! │     ┌──────────── commit lock ────────────┐                            │
//! │     │ store.remove_many(...)  (best-effort)│                            │
//! │     │ dispatch Logout                     │                            │
//! │     └─────────────────────────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! Network calls run outside the commit lock, so a slow identity service
//! never blocks a logout. The storage write and the dispatch that follows
//! it run under the lock, so two commits never interleave and the
//! published state always matches the last completed commit.

use std::sync::Arc;
use storefront_core::{
    redirect_for_role, reduce, AuthAction, AuthState, Destination, Role, User, EMPLOYEE_ID_KEY,
    ROLE_KEY, SESSION_KEYS, USERNAME_KEY,
};
use storefront_store::{PersistedStore, StoreResult};
use tokio::sync::{watch, Mutex, OnceCell};
use tracing::{debug, error, info, warn};

use crate::error::{SessionError, SessionResult};
use crate::service::{AuthService, Credentials, SignupRequest};

/// Owns the published [`AuthState`] and drives every transition.
pub struct SessionController {
    store: Arc<dyn PersistedStore>,
    service: Arc<dyn AuthService>,
    state: watch::Sender<AuthState>,
    initialized: OnceCell<AuthState>,
    commit: Mutex<()>,
}

impl SessionController {
    /// Creates a controller in the process-start state: anonymous and not
    /// yet initialized.
    pub fn new(store: Arc<dyn PersistedStore>, service: Arc<dyn AuthService>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        SessionController {
            store,
            service,
            state,
            initialized: OnceCell::new(),
            commit: Mutex::new(()),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every published state.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// True once [`initialize`](Self::initialize) has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized.initialized()
    }

    // =========================================================================
    // Initialize
    // =========================================================================

    /// Restores the session from the persisted store.
    ///
    /// Runs at most once per controller. Concurrent callers share the one
    /// in-flight run and every caller gets the state it produced. A store
    /// that cannot be read yields an anonymous session.
    pub async fn initialize(&self) -> AuthState {
        self.initialized
            .get_or_init(|| async {
                let action = match self.read_session().await {
                    Ok(Some(user)) => {
                        info!(username = %user.username, role = %user.role, "Restored session");
                        AuthAction::Initialize {
                            is_authenticated: true,
                            user: Some(user),
                        }
                    }
                    Ok(None) => {
                        debug!("No persisted session");
                        AuthAction::Initialize {
                            is_authenticated: false,
                            user: None,
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Treating unreadable session store as no session");
                        AuthAction::Initialize {
                            is_authenticated: false,
                            user: None,
                        }
                    }
                };

                let _guard = self.commit.lock().await;
                self.dispatch(action)
            })
            .await
            .clone()
    }

    async fn read_session(&self) -> SessionResult<Option<User>> {
        let username = self
            .store
            .get(USERNAME_KEY)
            .await
            .map_err(SessionError::StorageRead)?;
        let role = self
            .store
            .get(ROLE_KEY)
            .await
            .map_err(SessionError::StorageRead)?;

        let (username, role) = match (username, role) {
            (Some(username), Some(role)) if !username.is_empty() && !role.is_empty() => {
                (username, role)
            }
            _ => return Ok(None),
        };

        // Not part of the authenticated/anonymous decision.
        let employee_id = match self.store.get(EMPLOYEE_ID_KEY).await {
            Ok(id) => id.filter(|id| !id.is_empty()),
            Err(e) => {
                debug!(error = %e, "Could not read persisted employee id");
                None
            }
        };

        Ok(Some(User {
            username,
            role: Role::from(role.as_str()),
            employee_id,
        }))
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Logs in and returns where the user should land.
    ///
    /// On any error the published state and the persisted store are left as
    /// they were before the call.
    pub async fn login(&self, credentials: &Credentials) -> SessionResult<Destination> {
        self.initialize().await;

        info!(username = %credentials.username, "Logging in");
        let user = self.service.login(credentials).await.map_err(|e| {
            warn!(username = %credentials.username, error = %e, "Login failed");
            SessionError::from(e)
        })?;

        let destination = redirect_for_role(user.role);
        {
            let _guard = self.commit.lock().await;
            self.persist_session(&user).await?;
            self.dispatch(AuthAction::LoginSuccess { user: user.clone() });
        }

        info!(
            username = %user.username,
            role = %user.role,
            destination = %destination,
            "Logged in"
        );
        Ok(destination)
    }

    /// Writes the three session keys, putting the previous values back if
    /// the write fails.
    async fn persist_session(&self, user: &User) -> SessionResult<()> {
        let previous = self.read_keys().await;

        let entries = [
            (USERNAME_KEY, user.username.as_str()),
            (ROLE_KEY, user.role.as_str()),
            (EMPLOYEE_ID_KEY, user.employee_id.as_deref().unwrap_or("")),
        ];

        if let Err(e) = self.store.set_many(&entries).await {
            error!(error = %e, "Failed to persist session");
            match previous {
                Ok(previous) => self.restore_keys(previous).await,
                Err(read_err) => {
                    warn!(error = %read_err, "Previous session keys unknown, not restoring")
                }
            }
            return Err(SessionError::Persist(e));
        }

        Ok(())
    }

    async fn read_keys(&self) -> StoreResult<Vec<(&'static str, Option<String>)>> {
        let mut values = Vec::with_capacity(SESSION_KEYS.len());
        for key in SESSION_KEYS {
            values.push((key, self.store.get(key).await?));
        }
        Ok(values)
    }

    async fn restore_keys(&self, previous: Vec<(&'static str, Option<String>)>) {
        for (key, value) in previous {
            let result = match value {
                Some(value) => self.store.set(key, &value).await,
                None => self.store.remove(key).await,
            };
            if let Err(e) = result {
                warn!(key, error = %e, "Failed to restore session key");
            }
        }
    }

    // =========================================================================
    // Signup
    // =========================================================================

    /// Registers a new account. Never changes the published state.
    ///
    /// Returns [`Destination::Login`]: a new account still has to log in.
    pub async fn signup(&self, request: &SignupRequest) -> SessionResult<Destination> {
        info!(username = %request.username, "Signing up");
        self.service.signup(request).await.map_err(|e| {
            warn!(username = %request.username, error = %e, "Signup failed");
            SessionError::from(e)
        })?;

        info!(username = %request.username, "Signed up");
        Ok(Destination::Login)
    }

    // =========================================================================
    // Logout
    // =========================================================================

    /// Ends the session. Cannot fail: a store that refuses the removal is
    /// logged and the transition happens anyway.
    pub async fn logout(&self) -> AuthState {
        self.initialize().await;

        let _guard = self.commit.lock().await;
        if let Err(e) = self.store.remove_many(&SESSION_KEYS).await {
            warn!(error = %e, "Failed to clear persisted session");
        }
        let state = self.dispatch(AuthAction::Logout);

        info!("Logged out");
        state
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Applies `action` to the current state and publishes the result.
    /// Callers hold the commit lock.
    fn dispatch(&self, action: AuthAction) -> AuthState {
        debug!(?action, "Dispatching auth action");
        self.state.send_modify(|state| *state = reduce(state, action));
        self.state.borrow().clone()
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &*self.state.borrow())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
