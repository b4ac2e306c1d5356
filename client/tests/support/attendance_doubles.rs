//! Device and ledger doubles for attendance behaviour tests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use client::domain::ports::{
    AttendanceLedger, AttendanceLedgerError, LocationError, LocationPermission, LocationProvider,
};
use client::domain::{AttendanceCheckIn, PositionFix};
use mockable::Clock;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clock frozen at a single instant.
pub struct FixtureClock {
    pub utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Device whose permission answer and position are set by the scenario.
pub struct ScriptedDevice {
    permission: Mutex<LocationPermission>,
    fix: Mutex<Option<PositionFix>>,
}

impl Default for ScriptedDevice {
    fn default() -> Self {
        Self {
            permission: Mutex::new(LocationPermission::Granted),
            fix: Mutex::new(None),
        }
    }
}

impl ScriptedDevice {
    pub fn set_permission(&self, permission: LocationPermission) {
        *lock(&self.permission) = permission;
    }

    pub fn set_fix(&self, fix: PositionFix) {
        *lock(&self.fix) = Some(fix);
    }
}

#[async_trait]
impl LocationProvider for ScriptedDevice {
    async fn request_permission(&self) -> Result<LocationPermission, LocationError> {
        Ok(*lock(&self.permission))
    }

    async fn current_fix(&self) -> Result<PositionFix, LocationError> {
        (*lock(&self.fix)).ok_or_else(|| LocationError::unavailable("no satellite fix"))
    }
}

/// Ledger keeping accepted check-ins in memory.
#[derive(Default)]
pub struct RecordingLedger {
    entries: Mutex<Vec<AttendanceCheckIn>>,
}

impl RecordingLedger {
    pub fn entries(&self) -> Vec<AttendanceCheckIn> {
        lock(&self.entries).clone()
    }
}

#[async_trait]
impl AttendanceLedger for RecordingLedger {
    async fn record_check_in(
        &self,
        check_in: &AttendanceCheckIn,
    ) -> Result<(), AttendanceLedgerError> {
        lock(&self.entries).push(check_in.clone());
        Ok(())
    }
}
