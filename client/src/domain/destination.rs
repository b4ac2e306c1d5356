//! Screen sets and the role-to-destination mapping.
//!
//! Routing is a fixed, total function of [`Role`]. Deep links into another
//! role's screen set are redirected to the caller's own home by
//! [`RouteAccessPolicy`].

use std::fmt;

use crate::domain::Role;

/// Entry screen of a navigation stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Public sign-in flow for signed-out sessions.
    SignIn,
    GuestHome,
    ClientHome,
    ManagerHome,
}

impl Destination {
    /// Home destination for a resolved role.
    ///
    /// # Examples
    /// ```
    /// use client::domain::{Destination, Role};
    ///
    /// assert_eq!(Destination::for_role(Role::Manager).as_str(), "manager-home");
    /// ```
    #[must_use]
    pub const fn for_role(role: Role) -> Self {
        match role {
            Role::Guest => Self::GuestHome,
            Role::Client => Self::ClientHome,
            Role::Manager => Self::ManagerHome,
        }
    }

    /// Stable screen-set identifier understood by the router.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignIn => "sign-in",
            Self::GuestHome => "guest-home",
            Self::ClientHome => "client-home",
            Self::ManagerHome => "manager-home",
        }
    }

    /// Screen set this destination belongs to.
    #[must_use]
    pub const fn screen_set(self) -> ScreenSet {
        match self {
            Self::SignIn => ScreenSet::Auth,
            Self::GuestHome => ScreenSet::Guest,
            Self::ClientHome => ScreenSet::Client,
            Self::ManagerHome => ScreenSet::Manager,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Group of screens gated behind one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenSet {
    /// Sign-in and sign-up screens.
    Auth,
    /// Plot browsing.
    Guest,
    /// Visits, visit passes, feedback, and owned land.
    Client,
    /// Attendance and leave.
    Manager,
}

impl ScreenSet {
    /// Screen set owned by `role`.
    #[must_use]
    pub const fn for_role(role: Role) -> Self {
        Destination::for_role(role).screen_set()
    }
}

/// Outcome of checking a navigation request against the current role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// The request may proceed.
    Allow,
    /// The request must be replaced by this destination.
    Redirect(Destination),
}

/// Guards deep links and manual navigation by role.
#[derive(Debug, Default, Clone, Copy)]
pub struct RouteAccessPolicy;

impl RouteAccessPolicy {
    /// Decide whether a session with `role` (or `None` when signed out) may
    /// open `requested`.
    ///
    /// Signed-out sessions may only open the auth screens. Signed-in users may
    /// open their own screen set; every other request, including the auth
    /// screens, redirects to their home.
    #[must_use]
    pub fn check(&self, role: Option<Role>, requested: ScreenSet) -> RouteDecision {
        match role {
            None if requested == ScreenSet::Auth => RouteDecision::Allow,
            None => RouteDecision::Redirect(Destination::SignIn),
            Some(role) if ScreenSet::for_role(role) == requested => RouteDecision::Allow,
            Some(role) => RouteDecision::Redirect(Destination::for_role(role)),
        }
    }
}
