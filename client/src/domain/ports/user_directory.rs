//! Port for the backend user directory.
//!
//! The directory is the single source of truth for a user's [`Role`]. A
//! lookup that finds nothing is a normal outcome (`Ok(None)`), distinct from
//! transport or server failures.
//!
//! [`Role`]: crate::domain::Role

use async_trait::async_trait;

use crate::domain::{ExternalUserId, NewUserRecord, UserRecord};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// The directory could not be reached.
        Transport { message: String } => "user directory unreachable: {message}",
        /// The request did not complete within the transport timeout.
        Timeout { message: String } => "user directory timed out: {message}",
        /// The directory answered with an unexpected status.
        Server { status: u16, message: String } =>
            "user directory returned status {status}: {message}",
        /// A record already exists for the identifier.
        Conflict { external_id: String } =>
            "user record already exists for {external_id}",
        /// The response body did not match the expected shape.
        Decode { message: String } =>
            "user directory response could not be decoded: {message}",
    }
}

/// Read/create access to backend user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch the record for `external_id`, or `None` when no record exists.
    async fn lookup(
        &self,
        external_id: &ExternalUserId,
    ) -> Result<Option<UserRecord>, UserDirectoryError>;

    /// Create a record on first sign-in.
    ///
    /// Adapters return [`UserDirectoryError::Conflict`] when a record already
    /// exists; the client never overwrites or deletes records.
    async fn create(&self, fields: &NewUserRecord) -> Result<UserRecord, UserDirectoryError>;
}
