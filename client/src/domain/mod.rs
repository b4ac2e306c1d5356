//! Domain primitives, services, and ports.
//!
//! Purpose: hold the role-gating rules of the marketplace client
//! independently of any router, HTTP client, or device API. Adapters live in
//! `outbound` and `inbound`; everything here talks to them through
//! [`ports`].
//!
//! Public surface:
//! - Role / Destination / RouteAccessPolicy: role spellings and routing.
//! - Identity / SessionState / UserRecord: principals and directory rows.
//! - RoleGuard: role resolution and redirection guard.
//! - AttendanceService: geofenced manager check-in.

pub mod attendance;
pub mod destination;
pub mod identity;
pub mod ports;
pub mod role;
pub mod role_guard;
pub mod user_record;

pub use self::attendance::{
    AttendanceCheckIn, AttendanceError, AttendanceService, EARTH_RADIUS_METRES, GeoPoint,
    GeofenceValidationError, OfficeGeofence, PositionFix, haversine_distance_metres,
};
pub use self::destination::{Destination, RouteAccessPolicy, RouteDecision, ScreenSet};
pub use self::identity::{ExternalUserId, Identity, IdentityValidationError, SessionState};
pub use self::role::{Role, RoleParseError};
pub use self::role_guard::{GuardOutcome, GuardPhase, GuardReport, RoleGuard, RoleGuardPorts};
pub use self::user_record::{
    DERIVED_NAME_MIN, FALLBACK_DISPLAY_NAME, NewUserRecord, UserRecord, derive_display_name,
};
