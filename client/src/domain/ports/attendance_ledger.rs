//! Port for recording manager attendance on the backend.

use async_trait::async_trait;

use crate::domain::AttendanceCheckIn;

use super::define_port_error;

define_port_error! {
    /// Errors raised by attendance ledger adapters.
    pub enum AttendanceLedgerError {
        /// The backend could not be reached.
        Transport { message: String } => "attendance ledger unreachable: {message}",
        /// The backend refused the entry, for example a duplicate check-in.
        Rejected { message: String } => "attendance check-in rejected: {message}",
    }
}

/// Backend attendance records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceLedger: Send + Sync {
    /// Persist a validated check-in.
    async fn record_check_in(&self, check_in: &AttendanceCheckIn)
    -> Result<(), AttendanceLedgerError>;
}
