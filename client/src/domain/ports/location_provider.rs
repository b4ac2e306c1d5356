//! Port onto the device location service.

use async_trait::async_trait;

use crate::domain::PositionFix;

use super::define_port_error;

define_port_error! {
    /// Errors raised while obtaining a position fix.
    pub enum LocationError {
        /// Location services are switched off or no fix could be produced.
        Unavailable { message: String } => "location unavailable: {message}",
        /// The device did not produce a fix in time.
        Timeout { message: String } => "location request timed out: {message}",
    }
}

/// Foreground location permission as reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPermission {
    Granted,
    Denied,
}

/// Device location access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Ask for foreground permission, prompting the user when undecided.
    async fn request_permission(&self) -> Result<LocationPermission, LocationError>;

    /// Take a single high-accuracy position fix.
    async fn current_fix(&self) -> Result<PositionFix, LocationError>;
}
