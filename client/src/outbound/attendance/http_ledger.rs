//! Reqwest-backed attendance ledger.
//!
//! Check-ins are posted as JSON to `{directory}/attendance`. A `409` means
//! the backend already holds a check-in for the user and is surfaced as a
//! rejection like any other refusal.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::debug;

use crate::domain::AttendanceCheckIn;
use crate::domain::ports::{AttendanceLedger, AttendanceLedgerError};
use crate::outbound::{body_preview, join_segments};

const ATTENDANCE_SEGMENT: &str = "attendance";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckInDto<'a> {
    external_id: &'a str,
    latitude: f64,
    longitude: f64,
    distance_metres: f64,
    checked_in_at: DateTime<Utc>,
}

impl<'a> From<&'a AttendanceCheckIn> for CheckInDto<'a> {
    fn from(check_in: &'a AttendanceCheckIn) -> Self {
        Self {
            external_id: check_in.user_id.as_ref(),
            latitude: check_in.position.latitude(),
            longitude: check_in.position.longitude(),
            distance_metres: check_in.distance_metres,
            checked_in_at: check_in.checked_in_at,
        }
    }
}

/// Attendance ledger adapter speaking JSON over HTTP.
pub struct HttpAttendanceLedger {
    client: Client,
    base_url: Url,
}

impl HttpAttendanceLedger {
    /// Build an adapter rooted at the backend directory URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn attendance_url(&self) -> Result<Url, AttendanceLedgerError> {
        join_segments(&self.base_url, [ATTENDANCE_SEGMENT]).ok_or_else(|| {
            AttendanceLedgerError::transport(format!(
                "directory base URL cannot carry a path: {}",
                self.base_url
            ))
        })
    }
}

#[async_trait]
impl AttendanceLedger for HttpAttendanceLedger {
    async fn record_check_in(
        &self,
        check_in: &AttendanceCheckIn,
    ) -> Result<(), AttendanceLedgerError> {
        let url = self.attendance_url()?;
        debug!(%url, user_id = %check_in.user_id, "recording check-in");
        let response = self
            .client
            .post(url)
            .json(&CheckInDto::from(check_in))
            .send()
            .await
            .map_err(|error| AttendanceLedgerError::transport(error.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response
            .bytes()
            .await
            .map_err(|error| AttendanceLedgerError::transport(error.to_string()))?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AttendanceLedgerError {
    if status.is_server_error() {
        AttendanceLedgerError::transport(format!(
            "status {}: {}",
            status.as_u16(),
            body_preview(body)
        ))
    } else {
        AttendanceLedgerError::rejected(format!(
            "status {}: {}",
            status.as_u16(),
            body_preview(body)
        ))
    }
}
