//! # Auth Reducer
//!
//! The authentication state machine: `(state, action) → state`.
//!
//! ## Transition Table
//! ```text
//! ┌──────────────────┬─────────────────────────┬──────────────────────────────┐
//! │ Action           │ Payload                 │ Effect                       │
//! ├──────────────────┼─────────────────────────┼──────────────────────────────┤
//! │ Initialize       │ is_authenticated, user  │ sets both, is_initialized=T  │
//! │ LoginSuccess     │ user                    │ authenticated, user set      │
//! │ Logout           │ -                       │ anonymous, user cleared      │
//! │ Unknown          │ -                       │ state unchanged              │
//! └──────────────────┴─────────────────────────┴──────────────────────────────┘
//! ```
//!
//! `reduce` never fails and never performs side effects. Only
//! `Initialize` touches `is_initialized`, and only ever to `true`.
//!
//! ## Wire Form
//! Actions travel to and from the front-end bridge as adjacently tagged
//! JSON. A `type` this build does not know decodes as
//! [`AuthAction::Unknown`]:
//! ```json
//! { "type": "LOGIN_SUCCESS", "payload": { "user": { "username": "alice", "role": "Cashier" } } }
//! { "type": "LOGOUT" }
//! ```

use serde::de::{Deserializer, Error as _, IgnoredAny};
use serde::{Deserialize, Serialize};

use crate::types::{AuthState, User};

/// An action submitted to the reducer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum AuthAction {
    /// Result of the startup read of the persisted store.
    Initialize {
        is_authenticated: bool,
        user: Option<User>,
    },

    /// A live login succeeded.
    LoginSuccess { user: User },

    /// The user logged out (or was already anonymous).
    Logout,

    /// Any action type not listed above. Leaves state unchanged.
    Unknown,
}

// =============================================================================
// Decoding
// =============================================================================

const KNOWN_TYPES: [&str; 3] = ["INITIALIZE", "LOGIN_SUCCESS", "LOGOUT"];

#[derive(Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
enum KnownAction {
    Initialize {
        is_authenticated: bool,
        user: Option<User>,
    },
    LoginSuccess {
        user: User,
    },
    Logout,
}

/// Known types decode strictly. Anything else keeps its `type` and skips
/// whatever payload it carries.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireAction {
    Known(KnownAction),
    Other {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default, rename = "payload")]
        _payload: IgnoredAny,
    },
}

impl<'de> Deserialize<'de> for AuthAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match WireAction::deserialize(deserializer)? {
            WireAction::Known(KnownAction::Initialize {
                is_authenticated,
                user,
            }) => Ok(AuthAction::Initialize {
                is_authenticated,
                user,
            }),
            WireAction::Known(KnownAction::LoginSuccess { user }) => {
                Ok(AuthAction::LoginSuccess { user })
            }
            WireAction::Known(KnownAction::Logout) => Ok(AuthAction::Logout),
            WireAction::Other { kind, .. } if KNOWN_TYPES.contains(&kind.as_str()) => {
                Err(D::Error::custom(format!("malformed payload for {kind}")))
            }
            WireAction::Other { .. } => Ok(AuthAction::Unknown),
        }
    }
}

/// Applies `action` to `state` and returns the next state.
///
/// `Initialize` keeps the `user ⇔ is_authenticated` invariant: a payload
/// that claims authentication without a user produces an anonymous state,
/// and a user supplied alongside `is_authenticated = false` is dropped.
pub fn reduce(state: &AuthState, action: AuthAction) -> AuthState {
    match action {
        AuthAction::Initialize {
            is_authenticated,
            user,
        } => {
            let user = if is_authenticated { user } else { None };
            AuthState {
                is_authenticated: user.is_some(),
                is_initialized: true,
                user,
            }
        }
        AuthAction::LoginSuccess { user } => AuthState {
            is_authenticated: true,
            is_initialized: state.is_initialized,
            user: Some(user),
        },
        AuthAction::Logout => AuthState {
            is_authenticated: false,
            is_initialized: state.is_initialized,
            user: None,
        },
        AuthAction::Unknown => state.clone(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
