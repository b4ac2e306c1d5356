//! Session-change driver for the role guard.
//!
//! The identity provider's session is published on a `tokio::sync::watch`
//! channel. [`WatchSession`] reads the latest value for the guard's
//! cancellation checks; [`SessionWatcher`] starts a guard run whenever the
//! session finishes loading or switches to another user. Finished runs are
//! reaped as the session changes; the watcher stops once the sending side is
//! dropped and waits for in-flight runs.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::domain::ports::SessionSource;
use crate::domain::{ExternalUserId, GuardReport, RoleGuard, SessionState};

/// [`SessionSource`] backed by a watch receiver.
#[derive(Debug, Clone)]
pub struct WatchSession {
    receiver: watch::Receiver<SessionState>,
}

impl WatchSession {
    pub fn new(receiver: watch::Receiver<SessionState>) -> Self {
        Self { receiver }
    }
}

impl SessionSource for WatchSession {
    fn current(&self) -> SessionState {
        self.receiver.borrow().clone()
    }
}

/// Tracks which user the guard last ran for.
#[derive(Debug, Default)]
struct SignInTrigger {
    last: Option<ExternalUserId>,
}

impl SignInTrigger {
    /// Whether `state` is a fresh sign-in or a user switch.
    fn observe(&mut self, state: &SessionState) -> bool {
        match state {
            SessionState::Loading => false,
            SessionState::SignedOut => {
                self.last = None;
                false
            }
            SessionState::SignedIn(identity) => {
                let id = identity.external_id();
                if self.last.as_ref() == Some(id) {
                    return false;
                }
                self.last = Some(id.clone());
                true
            }
        }
    }
}

/// Runs the role guard in response to session changes.
pub struct SessionWatcher {
    guard: Arc<RoleGuard>,
    receiver: watch::Receiver<SessionState>,
}

impl SessionWatcher {
    pub fn new(guard: Arc<RoleGuard>, receiver: watch::Receiver<SessionState>) -> Self {
        Self { guard, receiver }
    }

    /// Watch the session until the sender is dropped.
    ///
    /// Finished runs are reaped on every session change so the task set
    /// only holds runs still in flight. Returns how many runs completed.
    pub async fn run(mut self) -> usize {
        let mut trigger = SignInTrigger::default();
        let mut runs = JoinSet::new();
        let mut completed = 0;

        loop {
            completed += reap_finished(&mut runs);
            let fire = trigger.observe(&self.receiver.borrow_and_update());
            if fire {
                let guard = Arc::clone(&self.guard);
                runs.spawn(async move { guard.run().await });
            }
            if self.receiver.changed().await.is_err() {
                debug!("session sender dropped; watcher stopping");
                break;
            }
        }

        while let Some(joined) = runs.join_next().await {
            completed += usize::from(record(joined));
        }
        completed
    }
}

/// Remove runs that already finished without waiting on the rest.
fn reap_finished(runs: &mut JoinSet<GuardReport>) -> usize {
    let mut reaped = 0;
    while let Some(joined) = runs.try_join_next() {
        reaped += usize::from(record(joined));
    }
    reaped
}

fn record(joined: Result<GuardReport, JoinError>) -> bool {
    match joined {
        Ok(report) => {
            info!(outcome = ?report.outcome, phases = ?report.phases, "role guard run complete");
            true
        }
        Err(error) => {
            warn!(%error, "role guard task failed");
            false
        }
    }
}
