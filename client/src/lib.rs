//! Role gating for the plot marketplace client.
//!
//! - [`domain`]: roles, routing rules, the role guard, and attendance.
//! - [`outbound`]: HTTP directory, identity and attendance adapters, a fixed
//!   location provider, and the router.
//! - [`inbound`]: session-change driver.
//! - [`config`]: OrthoConfig-backed settings.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
