//! # storefront-session: Session Core for the Storefront
//!
//! Decides whether a visitor has a session, exchanges credentials with the
//! identity service, remembers the minimal session facts across restarts,
//! and publishes one authoritative [`AuthState`](storefront_core::AuthState)
//! to the rest of the application.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Architecture                             │
//! │                                                                         │
//! │   Host startup                                                         │
//! │     SessionConfig::load ─► SqliteStore::open ─► HttpAuthService::new   │
//! │                               │                     │                   │
//! │                               ▼                     ▼                   │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                     SessionController                            │  │
//! │  │                                                                  │  │
//! │  │  initialize (once)   login   signup   logout                     │  │
//! │  │        │               │                 │                       │  │
//! │  │        └──── reduce(state, action) ◄─────┘                       │  │
//! │  │                        │                                         │  │
//! │  │                 watch::Sender<AuthState>                         │  │
//! │  └────────────────────────┬─────────────────────────────────────────┘  │
//! │                           │                                             │
//! │              AuthContext (cloned into every consumer)                   │
//! │              state() / subscribe() / login / signup / logout            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Identity service URL, timeouts, store location
//! - [`context`] - `AuthContext`, the handle consumers hold
//! - [`controller`] - `SessionController`, the single writer of state
//! - [`error`] - Session error types
//! - [`identity`] - HTTP client for `/auth/login` and `/auth/signup`
//! - [`service`] - `AuthService` trait and request types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use storefront_session::{AuthContext, HttpAuthService, SessionConfig};
//! use storefront_store::{SqliteStore, StoreConfig};
//!
//! let config = SessionConfig::load(None)?;
//! let store = SqliteStore::open(StoreConfig::new(config.store_path().unwrap())).await?;
//! let service = HttpAuthService::new(&config.identity)?;
//!
//! let auth = AuthContext::new(Arc::new(store), Arc::new(service));
//! auth.initialize().await;
//!
//! let destination = auth.login("alice", "secret").await?;
//! println!("navigate to {}", destination.path());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod identity;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{IdentitySettings, SessionConfig, StorageSettings};
pub use context::AuthContext;
pub use controller::SessionController;
pub use error::{AuthError, SessionError, SessionResult, SignupError};
pub use identity::HttpAuthService;
pub use service::{AuthService, Credentials, SignupRequest};

// =============================================================================
// End-to-End Tests
// =============================================================================
