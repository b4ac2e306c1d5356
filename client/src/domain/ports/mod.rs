//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven adapters (HTTP clients, the router, device services) implement
//! these traits; domain services depend only on the traits.

mod macros;
pub(crate) use macros::define_port_error;

mod attendance_ledger;
mod identity_provider;
mod location_provider;
mod navigator;
mod user_directory;

#[cfg(test)]
pub use attendance_ledger::MockAttendanceLedger;
pub use attendance_ledger::{AttendanceLedger, AttendanceLedgerError};
#[cfg(test)]
pub use identity_provider::{MockIdentityProvider, MockSessionSource};
pub use identity_provider::{IdentityProvider, IdentityProviderError, SessionSource};
#[cfg(test)]
pub use location_provider::MockLocationProvider;
pub use location_provider::{LocationError, LocationPermission, LocationProvider};
#[cfg(test)]
pub use navigator::MockNavigator;
pub use navigator::Navigator;
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{UserDirectory, UserDirectoryError};
