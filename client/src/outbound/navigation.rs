//! In-process stack router.
//!
//! Stands in for the mobile shell's router when the guard runs headless:
//! the stack is a plain vector and `replace` swaps its whole contents.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::info;

use crate::domain::Destination;
use crate::domain::ports::Navigator;

/// Navigation stack; the top entry is the screen the user sees.
#[derive(Debug, Default)]
pub struct StackNavigator {
    stack: Mutex<Vec<Destination>>,
}

impl StackNavigator {
    /// Start with `destination` already shown.
    pub fn starting_at(destination: Destination) -> Self {
        Self {
            stack: Mutex::new(vec![destination]),
        }
    }

    /// Push a screen on top of the current one, keeping history.
    pub fn push(&self, destination: Destination) {
        self.lock().push(destination);
    }

    /// Copy of the stack from root to top.
    pub fn stack(&self) -> Vec<Destination> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Destination>> {
        self.stack.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for StackNavigator {
    fn current(&self) -> Option<Destination> {
        self.lock().last().copied()
    }

    fn replace(&self, destination: Destination) {
        let mut stack = self.lock();
        stack.clear();
        stack.push(destination);
        info!(destination = destination.as_str(), "navigation stack replaced");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_navigator_has_no_current_screen() {
        assert_eq!(StackNavigator::default().current(), None);
    }

    #[test]
    fn replace_drops_history() {
        let navigator = StackNavigator::starting_at(Destination::SignIn);
        navigator.push(Destination::GuestHome);

        navigator.replace(Destination::ManagerHome);

        assert_eq!(navigator.stack(), vec![Destination::ManagerHome]);
        assert_eq!(navigator.current(), Some(Destination::ManagerHome));
    }

    #[test]
    fn current_reports_the_top_screen() {
        let navigator = StackNavigator::starting_at(Destination::ClientHome);
        navigator.push(Destination::ManagerHome);
        assert_eq!(navigator.current(), Some(Destination::ManagerHome));
    }
}
