//! # Application State
//!
//! Everything a command needs, built once per process.
//!
//! ```text
//! SessionConfig ──► SqliteStore::open(store_path) ──┐
//!               └─► HttpAuthService::new(identity) ─┴─► AuthContext
//!                                                          │
//!                                                   initialize().await
//! ```

use std::sync::Arc;
use storefront_session::{AuthContext, HttpAuthService, SessionConfig, SessionError};
use storefront_store::{SqliteStore, StoreConfig};
use tracing::info;

use crate::error::ApiError;

/// Opened session store plus the context built on it.
pub struct AppState {
    pub auth: AuthContext,
    store: SqliteStore,
}

impl AppState {
    /// Opens the store, builds the identity client and restores the
    /// persisted session. Returns once the session is initialized.
    pub async fn open(config: &SessionConfig) -> Result<Self, ApiError> {
        let path = config.store_path().ok_or_else(|| {
            SessionError::Config("could not determine a session store location".into())
        })?;
        info!(?path, "Session store path determined");

        let store = SqliteStore::open(StoreConfig::new(path)).await?;
        let service = HttpAuthService::new(&config.identity)?;

        let auth = AuthContext::new(Arc::new(store.clone()), Arc::new(service));
        let state = auth.initialize().await;
        info!(authenticated = state.is_authenticated, "Session initialized");

        Ok(AppState { auth, store })
    }

    /// Closes the session store.
    pub async fn close(self) {
        self.store.close().await;
    }
}
