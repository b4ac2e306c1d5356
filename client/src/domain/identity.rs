//! Signed-in principal supplied by the identity provider.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors returned by [`ExternalUserId::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityValidationError {
    /// The identifier was empty.
    #[error("external user id must not be empty")]
    EmptyId,
    /// The identifier carried leading or trailing whitespace.
    #[error("external user id must not contain surrounding whitespace")]
    PaddedId,
}

/// Identifier issued by the identity provider, used as the directory key.
///
/// The value is opaque (for example `u_42`); only emptiness and padding are
/// checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExternalUserId(String);

impl ExternalUserId {
    /// Validate and construct an identifier.
    ///
    /// # Examples
    /// ```
    /// use client::domain::ExternalUserId;
    ///
    /// let id = ExternalUserId::new("u_42").expect("valid id");
    /// assert_eq!(id.as_ref(), "u_42");
    /// assert!(ExternalUserId::new(" u_42").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let raw = id.into();
        if raw.is_empty() {
            return Err(IdentityValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(IdentityValidationError::PaddedId);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for ExternalUserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ExternalUserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ExternalUserId> for String {
    fn from(value: ExternalUserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ExternalUserId {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Profile of the signed-in user as cached by the identity provider.
///
/// ## Invariants
/// - `role_claim` is a denormalised copy of the backend role and may be
///   stale, absent, or in either letter case. It is never authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    external_id: ExternalUserId,
    full_name: Option<String>,
    first_name: Option<String>,
    primary_email: Option<String>,
    primary_phone: Option<String>,
    role_claim: Option<String>,
}

impl Identity {
    /// Identity with only an identifier; profile fields start empty.
    #[must_use]
    pub fn new(external_id: ExternalUserId) -> Self {
        Self {
            external_id,
            full_name: None,
            first_name: None,
            primary_email: None,
            primary_phone: None,
            role_claim: None,
        }
    }

    /// Attach the provider's full display name.
    #[must_use]
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Attach the provider's first name.
    #[must_use]
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Attach the primary email address.
    #[must_use]
    pub fn with_primary_email(mut self, email: impl Into<String>) -> Self {
        self.primary_email = Some(email.into());
        self
    }

    /// Attach the primary phone number.
    #[must_use]
    pub fn with_primary_phone(mut self, phone: impl Into<String>) -> Self {
        self.primary_phone = Some(phone.into());
        self
    }

    /// Attach the cached role claim exactly as the provider stores it.
    #[must_use]
    pub fn with_role_claim(mut self, claim: impl Into<String>) -> Self {
        self.role_claim = Some(claim.into());
        self
    }

    pub fn external_id(&self) -> &ExternalUserId {
        &self.external_id
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn primary_email(&self) -> Option<&str> {
        self.primary_email.as_deref()
    }

    pub fn primary_phone(&self) -> Option<&str> {
        self.primary_phone.as_deref()
    }

    pub fn role_claim(&self) -> Option<&str> {
        self.role_claim.as_deref()
    }
}

/// Session as observed by the client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// The provider has not finished restoring the session.
    #[default]
    Loading,
    /// Loaded with nobody signed in.
    SignedOut,
    /// Loaded with a signed-in identity.
    SignedIn(Identity),
}

impl SessionState {
    /// The signed-in identity, if the session is fully loaded.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::SignedIn(identity) => Some(identity),
            Self::Loading | Self::SignedOut => None,
        }
    }

    /// Whether the session still belongs to `external_id`.
    pub fn is_signed_in_as(&self, external_id: &ExternalUserId) -> bool {
        self.identity()
            .is_some_and(|identity| identity.external_id() == external_id)
    }
}
