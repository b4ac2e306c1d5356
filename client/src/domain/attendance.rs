//! Geofenced attendance check-in for managers.
//!
//! A check-in is accepted only when location permission is granted, the
//! device fix is accurate enough, and the great-circle distance to the
//! office is within the configured radius.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::ExternalUserId;
use crate::domain::ports::{
    AttendanceLedger, AttendanceLedgerError, LocationError, LocationPermission, LocationProvider,
};

/// Mean Earth radius used by the haversine formula, in metres.
pub const EARTH_RADIUS_METRES: f64 = 6_371_000.0;

/// Validation errors for coordinates and geofence parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeofenceValidationError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
    #[error("radius must be a positive number of metres, got {0}")]
    Radius(f64),
    #[error("accuracy ceiling must be a positive number of metres, got {0}")]
    AccuracyCeiling(f64),
}

/// WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Validate and construct a coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeofenceValidationError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeofenceValidationError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeofenceValidationError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in metres.
    ///
    /// # Examples
    /// ```
    /// use client::domain::GeoPoint;
    ///
    /// let a = GeoPoint::new(0.0, 0.0).expect("valid point");
    /// let b = GeoPoint::new(0.0, 1.0).expect("valid point");
    /// let metres = a.distance_to(&b);
    /// assert!((metres - 111_195.0).abs() < 1.0);
    /// ```
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        haversine_distance_metres(*self, *other)
    }
}

/// Haversine great-circle distance between two points, in metres.
#[must_use]
pub fn haversine_distance_metres(from: GeoPoint, to: GeoPoint) -> f64 {
    let phi_from = from.latitude.to_radians();
    let phi_to = to.latitude.to_radians();
    let delta_phi = (to.latitude - from.latitude).to_radians();
    let delta_lambda = (to.longitude - from.longitude).to_radians();

    let half_chord = (delta_phi / 2.0).sin().powi(2)
        + phi_from.cos() * phi_to.cos() * (delta_lambda / 2.0).sin().powi(2);
    let angular_distance = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());
    EARTH_RADIUS_METRES * angular_distance
}

/// Single device position reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub point: GeoPoint,
    /// Horizontal accuracy radius in metres, when the device reports one.
    pub accuracy_metres: Option<f64>,
}

/// Circular office boundary plus the worst accuracy accepted inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfficeGeofence {
    centre: GeoPoint,
    radius_metres: f64,
    max_accuracy_metres: f64,
}

impl OfficeGeofence {
    /// Validate and construct a geofence.
    pub fn new(
        centre: GeoPoint,
        radius_metres: f64,
        max_accuracy_metres: f64,
    ) -> Result<Self, GeofenceValidationError> {
        if !radius_metres.is_finite() || radius_metres <= 0.0 {
            return Err(GeofenceValidationError::Radius(radius_metres));
        }
        if !max_accuracy_metres.is_finite() || max_accuracy_metres <= 0.0 {
            return Err(GeofenceValidationError::AccuracyCeiling(max_accuracy_metres));
        }
        Ok(Self {
            centre,
            radius_metres,
            max_accuracy_metres,
        })
    }

    pub const fn centre(&self) -> GeoPoint {
        self.centre
    }

    pub const fn radius_metres(&self) -> f64 {
        self.radius_metres
    }

    /// Check a fix against the accuracy ceiling and the boundary, returning
    /// the distance to the centre on success.
    pub fn evaluate(&self, fix: &PositionFix) -> Result<f64, AttendanceError> {
        // A fix without a usable accuracy estimate cannot be trusted inside
        // a small radius.
        let accuracy = fix.accuracy_metres.unwrap_or(f64::INFINITY);
        let trusted = accuracy.is_finite() && accuracy >= 0.0;
        if !trusted || accuracy > self.max_accuracy_metres {
            return Err(AttendanceError::AccuracyTooLow {
                accuracy_metres: accuracy,
                max_metres: self.max_accuracy_metres,
            });
        }
        let distance = self.centre.distance_to(&fix.point);
        if distance > self.radius_metres {
            return Err(AttendanceError::OutsideGeofence {
                distance_metres: distance,
                radius_metres: self.radius_metres,
            });
        }
        Ok(distance)
    }
}

/// Accepted check-in as recorded on the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceCheckIn {
    pub user_id: ExternalUserId,
    pub position: GeoPoint,
    pub distance_metres: f64,
    pub checked_in_at: DateTime<Utc>,
}

/// Reasons a check-in is refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttendanceError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error("location accuracy {accuracy_metres:.0} m exceeds the {max_metres:.0} m limit")]
    AccuracyTooLow {
        accuracy_metres: f64,
        max_metres: f64,
    },
    #[error("{distance_metres:.0} m from the office; check-in requires {radius_metres:.0} m")]
    OutsideGeofence {
        distance_metres: f64,
        radius_metres: f64,
    },
    #[error(transparent)]
    Ledger(#[from] AttendanceLedgerError),
}

/// Manager attendance check-in service.
pub struct AttendanceService {
    location: Arc<dyn LocationProvider>,
    ledger: Arc<dyn AttendanceLedger>,
    clock: Arc<dyn Clock>,
    geofence: OfficeGeofence,
}

impl AttendanceService {
    pub fn new(
        location: Arc<dyn LocationProvider>,
        ledger: Arc<dyn AttendanceLedger>,
        clock: Arc<dyn Clock>,
        geofence: OfficeGeofence,
    ) -> Self {
        Self {
            location,
            ledger,
            clock,
            geofence,
        }
    }

    /// Validate the device position and record a check-in for `user_id`.
    pub async fn check_in(
        &self,
        user_id: &ExternalUserId,
    ) -> Result<AttendanceCheckIn, AttendanceError> {
        if self.location.request_permission().await? == LocationPermission::Denied {
            warn!(%user_id, "attendance check-in without location permission");
            return Err(AttendanceError::PermissionDenied);
        }

        let fix = self.location.current_fix().await?;
        let distance_metres = self.geofence.evaluate(&fix).inspect_err(|error| {
            warn!(%user_id, %error, "attendance check-in refused");
        })?;

        let check_in = AttendanceCheckIn {
            user_id: user_id.clone(),
            position: fix.point,
            distance_metres,
            checked_in_at: self.clock.utc(),
        };
        self.ledger.record_check_in(&check_in).await?;
        info!(%user_id, distance_metres, "attendance recorded");
        Ok(check_in)
    }
}
