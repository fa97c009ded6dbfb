//! # Commands Module
//!
//! Every subcommand the CLI exposes.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── session.rs  ◄─── status, login, signup, logout
//! └── config.rs   ◄─── Effective configuration
//! ```
//!
//! Session commands take only the [`AuthContext`](storefront_session::AuthContext)
//! they act on, so tests can run them against an in-memory store.

pub mod config;
pub mod session;
