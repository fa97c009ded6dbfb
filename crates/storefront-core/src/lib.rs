//! # storefront-core: Pure Session Logic for the Storefront
//!
//! This crate is the **heart** of the storefront session layer. It contains
//! the authentication state model and every transition rule as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Session Architecture                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Storefront screens (orders, payments)             │   │
//! │  │        read AuthState ◄── AuthContext ──► login/signup/logout  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          storefront-session (SessionController, HTTP)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ dispatch(AuthAction)                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐      ┌───────────┐      ┌───────────────┐     │   │
//! │  │   │   types   │      │  reducer  │      │   redirect    │     │   │
//! │  │   │ AuthState │      │AuthAction │      │  Destination  │     │   │
//! │  │   │ User/Role │      │  reduce() │      │ role → route  │     │   │
//! │  │   └───────────┘      └───────────┘      └───────────────┘     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `AuthState`, `User`, `Role`
//! - [`reducer`] - `AuthAction` and the `reduce` transition function
//! - [`redirect`] - Role-based post-login destination
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{reduce, redirect_for_role, AuthAction, AuthState, Destination, Role, User};
//!
//! let user = User::new("alice", Role::Cashier);
//! let state = reduce(&AuthState::default(), AuthAction::LoginSuccess { user });
//!
//! assert!(state.is_authenticated);
//! assert_eq!(redirect_for_role(Role::Cashier), Destination::CashierDashboard);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod redirect;
pub mod reducer;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use redirect::{redirect_for_role, Destination};
pub use reducer::{reduce, AuthAction};
pub use types::*;

// =============================================================================
// Persisted Session Keys
// =============================================================================

/// Key holding the logged-in username.
pub const USERNAME_KEY: &str = "username";

/// Key holding the user's role name.
pub const ROLE_KEY: &str = "role";

/// Key holding the employee identifier returned by a live login.
///
/// Persisted for downstream screens; not part of the
/// authenticated/anonymous decision on startup.
pub const EMPLOYEE_ID_KEY: &str = "employeeId";

/// Every key that makes up one persisted session.
///
/// Written together on login, removed together on logout.
pub const SESSION_KEYS: [&str; 3] = [USERNAME_KEY, ROLE_KEY, EMPLOYEE_ID_KEY];
