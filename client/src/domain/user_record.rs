//! Backend directory entries and the fields derived for new sign-ups.

use crate::domain::{ExternalUserId, Identity, Role};

/// Display name used when the identity carries nothing better.
pub const FALLBACK_DISPLAY_NAME: &str = "User";
/// Shortest email local part, in characters, accepted as a display name.
pub const DERIVED_NAME_MIN: usize = 2;

/// Authoritative per-user row held by the backend directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub external_id: ExternalUserId,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
}

/// Fields submitted when a directory entry is created on first sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub external_id: ExternalUserId,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
}

impl NewUserRecord {
    /// Derive creation fields from a freshly signed-in identity.
    ///
    /// The role is always [`Role::Guest`]; promotion happens on the backend.
    /// A missing email is submitted as the empty string.
    ///
    /// # Examples
    /// ```
    /// use client::domain::{ExternalUserId, Identity, NewUserRecord, Role};
    ///
    /// let identity = Identity::new(ExternalUserId::new("u_42").expect("id"))
    ///     .with_primary_email("a@b.com");
    /// let fields = NewUserRecord::for_identity(&identity);
    /// assert_eq!(fields.name, "User");
    /// assert_eq!(fields.role, Role::Guest);
    /// ```
    #[must_use]
    pub fn for_identity(identity: &Identity) -> Self {
        Self {
            external_id: identity.external_id().clone(),
            email: identity.primary_email().unwrap_or_default().to_owned(),
            name: derive_display_name(identity),
            phone: non_blank(identity.primary_phone()).map(str::to_owned),
            role: Role::Guest,
        }
    }
}

/// Pick a display name: full name, then first name, then the local part of
/// the primary email, else [`FALLBACK_DISPLAY_NAME`].
///
/// Candidates are trimmed and skipped when blank. The email local part is
/// also skipped when shorter than [`DERIVED_NAME_MIN`] characters.
#[must_use]
pub fn derive_display_name(identity: &Identity) -> String {
    non_blank(identity.full_name())
        .or_else(|| non_blank(identity.first_name()))
        .or_else(|| usable_local_part(identity.primary_email()))
        .unwrap_or(FALLBACK_DISPLAY_NAME)
        .to_owned()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

fn usable_local_part(email: Option<&str>) -> Option<&str> {
    non_blank(email.and_then(email_local_part))
        .filter(|local| local.chars().count() >= DERIVED_NAME_MIN)
}

fn email_local_part(email: &str) -> Option<&str> {
    email.trim().split_once('@').map(|(local, _)| local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn identity() -> Identity {
        Identity::new(ExternalUserId::new("u_42").expect("valid id"))
    }

    #[rstest]
    fn prefers_full_name(identity: Identity) {
        let identity = identity
            .with_full_name("Ada Lovelace")
            .with_first_name("Ada")
            .with_primary_email("ada@example.com");
        assert_eq!(derive_display_name(&identity), "Ada Lovelace");
    }

    #[rstest]
    fn falls_back_to_first_name_when_full_name_blank(identity: Identity) {
        let identity = identity
            .with_full_name("   ")
            .with_first_name(" Ada ")
            .with_primary_email("ada@example.com");
        assert_eq!(derive_display_name(&identity), "Ada");
    }

    #[rstest]
    fn falls_back_to_email_local_part(identity: Identity) {
        let identity = identity.with_primary_email("surveyor@plots.test");
        assert_eq!(derive_display_name(&identity), "surveyor");
    }

    #[rstest]
    #[case("@plots.test")]
    #[case("not-an-email")]
    #[case("a@b.com")]
    fn unusable_email_yields_fallback(identity: Identity, #[case] email: &str) {
        let identity = identity.with_primary_email(email);
        assert_eq!(derive_display_name(&identity), FALLBACK_DISPLAY_NAME);
    }

    #[rstest]
    #[case::cjk_full_name("李")]
    #[case::initial("J")]
    fn single_character_full_name_is_kept(identity: Identity, #[case] full_name: &str) {
        let identity = identity
            .with_full_name(full_name)
            .with_first_name("Wei")
            .with_primary_email("li.wei@plots.test");
        assert_eq!(derive_display_name(&identity), full_name);
    }

    #[rstest]
    fn single_character_first_name_beats_email(identity: Identity) {
        let identity = identity
            .with_first_name("J")
            .with_primary_email("jordan@plots.test");
        assert_eq!(derive_display_name(&identity), "J");
    }

    #[rstest]
    fn new_record_defaults_to_guest_with_empty_email(identity: Identity) {
        let fields = NewUserRecord::for_identity(&identity.with_role_claim("manager"));
        assert_eq!(fields.role, Role::Guest);
        assert_eq!(fields.email, "");
        assert_eq!(fields.name, FALLBACK_DISPLAY_NAME);
        assert!(fields.phone.is_none());
    }

    #[rstest]
    fn new_record_carries_phone(identity: Identity) {
        let fields = NewUserRecord::for_identity(&identity.with_primary_phone("+15550100"));
        assert_eq!(fields.phone.as_deref(), Some("+15550100"));
    }
}
