//! Inbound adapters that translate external events into domain service
//! calls.
//!
//! Session changes arrive through [`session_watcher`], which drives the role
//! guard on every sign-in and user switch.

pub mod session_watcher;

pub use session_watcher::{SessionWatcher, WatchSession};
