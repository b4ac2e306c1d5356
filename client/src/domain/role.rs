//! Marketplace roles and their wire spellings.
//!
//! The backend stores roles in upper case (`GUEST`, `CLIENT`, `MANAGER`)
//! while the identity provider's cached claim and the router use lower case.
//! Parsing is case-insensitive so both spellings normalise to the same
//! [`Role`] at the boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role that gates which screen set and feature set a user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// Browsing-only access; the default for new and unverified users.
    #[default]
    Guest,
    /// Buyer with visits, passes, and owned-land records.
    Client,
    /// Staff member with attendance and leave workflows.
    Manager,
}

/// Errors raised when a raw role string cannot be normalised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleParseError {
    /// The value was empty once trimmed.
    #[error("role must not be empty")]
    Empty,
    /// The value did not name a known role.
    #[error("unrecognised role: {value}")]
    Unrecognised { value: String },
}

impl Role {
    /// Every role, in ascending order of privilege.
    pub const ALL: [Self; 3] = [Self::Guest, Self::Client, Self::Manager];

    /// Upper-case spelling used by the backend user directory.
    #[must_use]
    pub const fn as_backend_str(self) -> &'static str {
        match self {
            Self::Guest => "GUEST",
            Self::Client => "CLIENT",
            Self::Manager => "MANAGER",
        }
    }

    /// Lower-case spelling used by the identity claim and routing.
    #[must_use]
    pub const fn as_claim_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Client => "client",
            Self::Manager => "manager",
        }
    }

    /// Parse a role in either spelling, ignoring case and surrounding
    /// whitespace.
    ///
    /// # Examples
    /// ```
    /// use client::domain::Role;
    ///
    /// assert_eq!(Role::parse("MANAGER"), Ok(Role::Manager));
    /// assert_eq!(Role::parse(" client "), Ok(Role::Client));
    /// assert!(Role::parse("owner").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, RoleParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RoleParseError::Empty);
        }
        Self::ALL
            .into_iter()
            .find(|role| role.as_backend_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| RoleParseError::Unrecognised {
                value: trimmed.to_owned(),
            })
    }

    /// Parse a backend value, falling back to [`Role::Guest`] for anything
    /// unrecognised.
    #[must_use]
    pub fn from_backend_lenient(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_else(|error| {
            tracing::warn!(%error, "backend returned an unusable role; treating as guest");
            Self::Guest
        })
    }

    /// Whether a cached claim already records this role.
    ///
    /// Absent, blank, and unrecognised claims never match, so they are
    /// always repaired.
    #[must_use]
    pub fn matches_claim(self, claim: Option<&str>) -> bool {
        claim.and_then(|raw| Self::parse(raw).ok()) == Some(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_claim_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Role {
    type Error = RoleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_backend_str().to_owned()
    }
}
