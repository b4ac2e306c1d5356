//! Location adapter reporting a fix supplied up front.
//!
//! Used by the `check-in` command, where the operator's device has already
//! taken a reading and passes it in as arguments.

use async_trait::async_trait;

use crate::domain::PositionFix;
use crate::domain::ports::{LocationError, LocationPermission, LocationProvider};

/// [`LocationProvider`] that always grants permission and returns one fix.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    fix: PositionFix,
}

impl FixedLocation {
    pub const fn new(fix: PositionFix) -> Self {
        Self { fix }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn request_permission(&self) -> Result<LocationPermission, LocationError> {
        Ok(LocationPermission::Granted)
    }

    async fn current_fix(&self) -> Result<PositionFix, LocationError> {
        Ok(self.fix)
    }
}
