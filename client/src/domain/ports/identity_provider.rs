//! Ports onto the external identity provider.
//!
//! [`SessionSource`] exposes the provider's current session snapshot;
//! [`IdentityProvider`] mutates the cached role claim. Claim writes are
//! best-effort: callers log failures and carry on.

use async_trait::async_trait;

use crate::domain::{ExternalUserId, Role, SessionState};

use super::define_port_error;

define_port_error! {
    /// Errors raised when the provider rejects or loses a metadata write.
    pub enum IdentityProviderError {
        /// The provider could not be reached.
        Transport { message: String } => "identity provider unreachable: {message}",
        /// The client's credentials were refused.
        Unauthorised { message: String } => "identity provider refused credentials: {message}",
        /// The provider answered with an unexpected status.
        Rejected { status: u16, message: String } =>
            "identity provider rejected the update with status {status}: {message}",
    }
}

/// Metadata mutation on the identity provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Overwrite the cached role claim for `external_id`.
    async fn set_role_claim(
        &self,
        external_id: &ExternalUserId,
        role: Role,
    ) -> Result<(), IdentityProviderError>;
}

/// Read access to the current session.
///
/// Implementations must be cheap: the role guard polls this after every
/// suspension point to notice sign-outs.
#[cfg_attr(test, mockall::automock)]
pub trait SessionSource: Send + Sync {
    /// Snapshot of the session as it stands now.
    fn current(&self) -> SessionState;
}
