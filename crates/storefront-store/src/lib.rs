//! # storefront-store: Persisted Session Store
//!
//! Durable key-value storage for the minimal session facts the storefront
//! remembers across restarts.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Data Flow                                │
//! │                                                                         │
//! │  SessionController (storefront-session)                                │
//! │       │  initialize: get(username), get(role)                          │
//! │       │  login:      set_many(username, role, employeeId)              │
//! │       │  logout:     remove_many(username, role, employeeId)           │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 storefront-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────────┐   ┌───────────────┐   ┌──────────────┐   │   │
//! │  │   │ PersistedStore │   │  SqliteStore  │   │  MemoryStore │   │   │
//! │  │   │   (store.rs)   │◄──│  (sqlite.rs)  │   │  (memory.rs) │   │   │
//! │  │   │  get/set/remove│   │  kv_store     │   │  HashMap     │   │   │
//! │  │   └────────────────┘   └───────────────┘   └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  session.db (platform data directory)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_store::{PersistedStore, SqliteStore, StoreConfig};
//!
//! let store = SqliteStore::open(StoreConfig::new("session.db")).await?;
//! store.set("username", "alice").await?;
//! assert_eq!(store.get("username").await?.as_deref(), Some("alice"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod migrations;
pub mod sqlite;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, StoreConfig};
pub use store::PersistedStore;
