//! Forward-only state machine for a single guard invocation.

use std::fmt;

/// Phase of one role-guard invocation.
///
/// ```text
/// WaitingForSession -> Resolving -> RoleDecided -> Navigated
///                          \-> Degraded -/
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardPhase {
    /// Initial phase; no identity has been read yet.
    WaitingForSession,
    /// Directory lookup (and any creation) in progress.
    Resolving,
    /// The directory failed; the role falls back to guest.
    Degraded,
    /// The authoritative role is known.
    RoleDecided,
    /// Terminal: the destination is current in the router.
    Navigated,
}

impl GuardPhase {
    /// Whether `next` is a legal successor of `self`.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::WaitingForSession, Self::Resolving)
                | (Self::Resolving, Self::Degraded)
                | (Self::Resolving, Self::RoleDecided)
                | (Self::Degraded, Self::RoleDecided)
                | (Self::RoleDecided, Self::Navigated)
        )
    }
}

impl fmt::Display for GuardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::WaitingForSession => "WAITING_FOR_SESSION",
            Self::Resolving => "RESOLVING",
            Self::Degraded => "DEGRADED",
            Self::RoleDecided => "ROLE_DECIDED",
            Self::Navigated => "NAVIGATED",
        };
        f.write_str(label)
    }
}

/// Ordered record of the phases one invocation passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PhaseLog {
    current: GuardPhase,
    history: Vec<GuardPhase>,
}

impl PhaseLog {
    pub(crate) fn new() -> Self {
        Self {
            current: GuardPhase::WaitingForSession,
            history: vec![GuardPhase::WaitingForSession],
        }
    }

    pub(crate) fn current(&self) -> GuardPhase {
        self.current
    }

    /// Move to `next`. Illegal transitions are logged and ignored so the
    /// machine never moves backwards.
    pub(crate) fn advance(&mut self, next: GuardPhase) {
        if !self.current.can_advance_to(next) {
            tracing::error!(from = %self.current, to = %next, "ignored illegal guard transition");
            return;
        }
        tracing::debug!(from = %self.current, to = %next, "role guard transition");
        self.current = next;
        self.history.push(next);
    }

    pub(crate) fn into_history(self) -> Vec<GuardPhase> {
        self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(GuardPhase::Resolving, GuardPhase::WaitingForSession)]
    #[case(GuardPhase::RoleDecided, GuardPhase::Resolving)]
    #[case(GuardPhase::Navigated, GuardPhase::RoleDecided)]
    #[case(GuardPhase::Degraded, GuardPhase::Resolving)]
    #[case(GuardPhase::WaitingForSession, GuardPhase::Navigated)]
    fn rejects_backward_and_skipping_transitions(
        #[case] from: GuardPhase,
        #[case] to: GuardPhase,
    ) {
        assert!(!from.can_advance_to(to));
    }

    #[test]
    fn log_records_forward_path_only() {
        let mut log = PhaseLog::new();
        log.advance(GuardPhase::Resolving);
        log.advance(GuardPhase::Degraded);
        log.advance(GuardPhase::Resolving);
        log.advance(GuardPhase::RoleDecided);
        log.advance(GuardPhase::Navigated);

        assert_eq!(log.current(), GuardPhase::Navigated);
        assert_eq!(
            log.into_history(),
            vec![
                GuardPhase::WaitingForSession,
                GuardPhase::Resolving,
                GuardPhase::Degraded,
                GuardPhase::RoleDecided,
                GuardPhase::Navigated,
            ]
        );
    }
}
