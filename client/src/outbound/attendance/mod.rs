//! Attendance ledger adapter backed by the backend's HTTP API.

mod http_ledger;

pub use http_ledger::HttpAttendanceLedger;
