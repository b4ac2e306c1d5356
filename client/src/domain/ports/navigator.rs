//! Port onto the client-side stack router.

use crate::domain::Destination;

/// Stack-based router.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Screen the user currently sees (the top of the stack), if any.
    fn current(&self) -> Option<Destination>;

    /// Replace the whole stack with `destination`; no history entry is kept
    /// for the previous screen.
    fn replace(&self, destination: Destination);
}
