//! # Redirect Policy
//!
//! Decides *where* the storefront goes after a successful login. How the
//! host actually navigates is its own business: it receives a
//! [`Destination`] and maps it onto its router.
//!
//! ```text
//! Cashier     ──► /cashier-dashboard
//! Consultant  ──► /consultant-dashboard
//! anything    ──► /
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Role;

/// A navigation target the session layer can ask the host for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Cashier dashboard.
    CashierDashboard,
    /// Consultant dashboard.
    ConsultantDashboard,
    /// Storefront home.
    Home,
    /// Login page, shown after a successful signup.
    Login,
}

impl Destination {
    /// Route path for this destination.
    pub const fn path(&self) -> &'static str {
        match self {
            Destination::CashierDashboard => "/cashier-dashboard",
            Destination::ConsultantDashboard => "/consultant-dashboard",
            Destination::Home => "/",
            Destination::Login => "/login",
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Post-login destination for a role.
///
/// Only meaningful after a successful login; signup and logout never
/// consult it.
pub fn redirect_for_role(role: Role) -> Destination {
    match role {
        Role::Cashier => Destination::CashierDashboard,
        Role::Consultant => Destination::ConsultantDashboard,
        Role::Other => Destination::Home,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_by_role() {
        assert_eq!(redirect_for_role(Role::Cashier), Destination::CashierDashboard);
        assert_eq!(
            redirect_for_role(Role::Consultant),
            Destination::ConsultantDashboard
        );
        assert_eq!(redirect_for_role(Role::Other), Destination::Home);
    }

    #[test]
    fn test_unknown_role_names_go_home() {
        for name in ["Manager", "", "consultant", "CASHIER"] {
            assert_eq!(redirect_for_role(Role::from(name)), Destination::Home);
        }
    }

    #[test]
    fn test_paths() {
        assert_eq!(Destination::CashierDashboard.path(), "/cashier-dashboard");
        assert_eq!(Destination::ConsultantDashboard.path(), "/consultant-dashboard");
        assert_eq!(Destination::Home.path(), "/");
        assert_eq!(Destination::Login.to_string(), "/login");
    }
}
