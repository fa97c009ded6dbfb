//! # Domain Types
//!
//! Session types shared by every layer of the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Session Types                                   │
//! │                                                                         │
//! │  ┌──────────────────────┐   ┌─────────────────┐   ┌─────────────────┐  │
//! │  │      AuthState       │   │      User       │   │      Role       │  │
//! │  │  ──────────────────  │   │  ─────────────  │   │  ─────────────  │  │
//! │  │  is_authenticated    │──►│  username       │──►│  Cashier        │  │
//! │  │  is_initialized      │   │  role           │   │  Consultant     │  │
//! │  │  user: Option<User>  │   │  employee_id?   │   │  Other          │  │
//! │  └──────────────────────┘   └─────────────────┘   └─────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! `user.is_none()` if and only if `!is_authenticated`. The reducer is the
//! only producer of new states and preserves it on every transition.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

// =============================================================================
// Role
// =============================================================================

/// Coarse permission category attached to a user.
///
/// Only used to pick the post-login destination. Any role name the identity
/// service sends that is not `Cashier` or `Consultant` is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, TS)]
#[ts(export)]
pub enum Role {
    /// Works the till; lands on the cashier dashboard.
    Cashier,
    /// Handles customer consultations; lands on the consultant dashboard.
    Consultant,
    /// Customers and any role this build does not know about.
    #[default]
    Other,
}

impl Role {
    /// Canonical name, as written to the persisted store.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Cashier => "Cashier",
            Role::Consultant => "Consultant",
            Role::Other => "Other",
        }
    }
}

impl From<&str> for Role {
    /// Total parse: exact (case-sensitive) match on the two staff roles,
    /// everything else is `Other`.
    fn from(name: &str) -> Self {
        match name {
            "Cashier" => Role::Cashier,
            "Consultant" => Role::Consultant,
            _ => Role::Other,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Role::from(name.as_str()))
    }
}

// =============================================================================
// User
// =============================================================================

/// The user behind an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Login name.
    pub username: String,

    /// Role used for redirect selection.
    #[serde(default)]
    pub role: Role,

    /// Employee identifier. Known after a live login; a session restored
    /// from the persisted store may not carry it.
    #[serde(default)]
    pub employee_id: Option<String>,
}

impl User {
    /// Creates a user without an employee identifier.
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        User {
            username: username.into(),
            role,
            employee_id: None,
        }
    }

    /// Sets the employee identifier.
    pub fn with_employee_id(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }
}

// =============================================================================
// AuthState
// =============================================================================

/// Published authentication state.
///
/// Immutable value: every transition builds a new one through
/// [`crate::reduce`]. The default value is the process-start state, which
/// is *not* initialized until the startup read of the persisted store has
/// completed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    /// Whether a user is currently recognized as logged in.
    pub is_authenticated: bool,

    /// Flips to true exactly once, when startup initialization completes.
    pub is_initialized: bool,

    /// The logged-in user, present iff `is_authenticated`.
    pub user: Option<User>,
}

impl AuthState {
    /// True when nobody is logged in.
    pub fn is_anonymous(&self) -> bool {
        !self.is_authenticated
    }

    /// Role of the logged-in user, if any.
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Username of the logged-in user, if any.
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from("Cashier"), Role::Cashier);
        assert_eq!(Role::from("Consultant"), Role::Consultant);
        assert_eq!(Role::from("Customer"), Role::Other);
        assert_eq!(Role::from("cashier"), Role::Other);
        assert_eq!(Role::from(""), Role::Other);
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Consultant).unwrap(), "\"Consultant\"");
        let role: Role = serde_json::from_str("\"Manager\"").unwrap();
        assert_eq!(role, Role::Other);
    }

    #[test]
    fn test_default_state_is_uninitialized_anonymous() {
        let state = AuthState::default();
        assert!(!state.is_authenticated);
        assert!(!state.is_initialized);
        assert!(state.user.is_none());
        assert!(state.is_anonymous());
    }

    #[test]
    fn test_state_json_shape() {
        let state = AuthState {
            is_authenticated: true,
            is_initialized: true,
            user: Some(User::new("alice", Role::Cashier).with_employee_id("42")),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["isAuthenticated"], true);
        assert_eq!(json["isInitialized"], true);
        assert_eq!(json["user"]["username"], "alice");
        assert_eq!(json["user"]["role"], "Cashier");
        assert_eq!(json["user"]["employeeId"], "42");
    }

    #[test]
    fn test_user_without_role_defaults_to_other() {
        let user: User = serde_json::from_str(r#"{"username":"bob"}"#).unwrap();
        assert_eq!(user.role, Role::Other);
        assert!(user.employee_id.is_none());
    }
}
