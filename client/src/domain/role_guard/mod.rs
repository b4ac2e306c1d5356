//! Role resolution and redirection guard.
//!
//! The guard reconciles the identity provider's cached role claim with the
//! backend directory's authoritative role and replaces the navigation stack
//! with the resolved role's home. Reconciliation is one way: backend to
//! claim, never the reverse.
//!
//! Guarantees per invocation:
//! - at most one lookup, at most one create, at most one claim write;
//! - backend failures degrade to [`Role::Guest`] and never escape;
//! - overlapping invocations for the same user are refused rather than
//!   raced;
//! - a sign-out (or user switch) during resolution discards the result and
//!   issues no navigation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::ports::{IdentityProvider, Navigator, SessionSource, UserDirectory};
use crate::domain::{
    Destination, ExternalUserId, Identity, NewUserRecord, Role, RouteAccessPolicy, RouteDecision,
};

mod phase;
mod single_flight;

pub use phase::GuardPhase;
use phase::PhaseLog;
use single_flight::SingleFlight;


/// Port bundle required by the role guard.
pub struct RoleGuardPorts {
    /// Backend user directory.
    pub directory: Arc<dyn UserDirectory>,
    /// Identity provider metadata writes.
    pub identity_provider: Arc<dyn IdentityProvider>,
    /// Current session snapshot.
    pub session: Arc<dyn SessionSource>,
    /// Stack router.
    pub navigator: Arc<dyn Navigator>,
}

/// How one invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The session is loading or signed out; nothing was done.
    AwaitingSession,
    /// Another invocation for this user is still in flight.
    AlreadyResolving { external_id: ExternalUserId },
    /// The user signed out or switched mid-flight; the result was dropped.
    Cancelled { external_id: ExternalUserId },
    /// The stack was replaced with `destination`.
    Navigated {
        role: Role,
        destination: Destination,
        degraded: bool,
    },
    /// The visible screen already belongs to `role`, so no command was
    /// issued.
    AlreadyAt {
        role: Role,
        destination: Destination,
        degraded: bool,
    },
}

impl GuardOutcome {
    /// Destination the user ends up on, when the guard decided one.
    #[must_use]
    pub const fn destination(&self) -> Option<Destination> {
        match self {
            Self::Navigated { destination, .. } | Self::AlreadyAt { destination, .. } => {
                Some(*destination)
            }
            Self::AwaitingSession | Self::AlreadyResolving { .. } | Self::Cancelled { .. } => None,
        }
    }

    /// Role the guard resolved, when it got that far.
    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        match self {
            Self::Navigated { role, .. } | Self::AlreadyAt { role, .. } => Some(*role),
            Self::AwaitingSession | Self::AlreadyResolving { .. } | Self::Cancelled { .. } => None,
        }
    }
}

/// Outcome plus the phases the invocation passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardReport {
    pub outcome: GuardOutcome,
    pub phases: Vec<GuardPhase>,
}

#[derive(Debug, Clone, Copy)]
struct Resolution {
    role: Role,
    degraded: bool,
}

impl Resolution {
    const fn authoritative(role: Role) -> Self {
        Self {
            role,
            degraded: false,
        }
    }

    const fn degraded() -> Self {
        Self {
            role: Role::Guest,
            degraded: true,
        }
    }
}

/// Role resolution and redirection guard.
pub struct RoleGuard {
    directory: Arc<dyn UserDirectory>,
    identity_provider: Arc<dyn IdentityProvider>,
    session: Arc<dyn SessionSource>,
    navigator: Arc<dyn Navigator>,
    in_flight: SingleFlight<ExternalUserId>,
}

impl RoleGuard {
    /// Build a guard over the supplied ports.
    pub fn new(ports: RoleGuardPorts) -> Self {
        Self {
            directory: ports.directory,
            identity_provider: ports.identity_provider,
            session: ports.session,
            navigator: ports.navigator,
            in_flight: SingleFlight::default(),
        }
    }

    /// Whether an invocation for `external_id` is currently in flight.
    pub fn is_resolving(&self, external_id: &ExternalUserId) -> bool {
        self.in_flight.is_active(external_id)
    }

    /// Resolve the signed-in user's role and route them to its home.
    ///
    /// Call on session-loaded and user-changed events. Calling while the
    /// session is still loading is harmless and returns
    /// [`GuardOutcome::AwaitingSession`].
    pub async fn run(&self) -> GuardReport {
        let mut phases = PhaseLog::new();
        let outcome = self.run_with(&mut phases).await;
        debug!(phase = %phases.current(), ?outcome, "role guard finished");
        GuardReport {
            outcome,
            phases: phases.into_history(),
        }
    }

    async fn run_with(&self, phases: &mut PhaseLog) -> GuardOutcome {
        let Some(identity) = self.session.current().identity().cloned() else {
            debug!("session not ready; role guard waiting");
            return GuardOutcome::AwaitingSession;
        };
        let external_id = identity.external_id().clone();

        let Some(_permit) = self.in_flight.try_acquire(external_id.clone()) else {
            debug!(%external_id, "role resolution already in flight; ignoring");
            return GuardOutcome::AlreadyResolving { external_id };
        };

        phases.advance(GuardPhase::Resolving);
        let Some(resolution) = self.resolve(&identity, phases).await else {
            return Self::cancelled(external_id);
        };
        phases.advance(GuardPhase::RoleDecided);

        if !self.still_signed_in_as(&external_id) {
            return Self::cancelled(external_id);
        }

        let destination = Destination::for_role(resolution.role);
        let outcome = match self.route_decision(resolution.role) {
            RouteDecision::Allow => {
                debug!(%external_id, %destination, "role home already showing");
                GuardOutcome::AlreadyAt {
                    role: resolution.role,
                    destination,
                    degraded: resolution.degraded,
                }
            }
            RouteDecision::Redirect(target) => {
                info!(
                    %external_id,
                    role = %resolution.role,
                    destination = %target,
                    degraded = resolution.degraded,
                    "routing to role home"
                );
                self.navigator.replace(target);
                GuardOutcome::Navigated {
                    role: resolution.role,
                    destination: target,
                    degraded: resolution.degraded,
                }
            }
        };
        phases.advance(GuardPhase::Navigated);
        outcome
    }

    /// Returns `None` when the session moved away from `identity` while a
    /// directory call was outstanding.
    async fn resolve(&self, identity: &Identity, phases: &mut PhaseLog) -> Option<Resolution> {
        let external_id = identity.external_id();
        let lookup = self.directory.lookup(external_id).await;
        if !self.still_signed_in_as(external_id) {
            return None;
        }

        match lookup {
            Ok(Some(record)) => {
                if !record.role.matches_claim(identity.role_claim()) {
                    debug!(
                        %external_id,
                        claim = identity.role_claim().unwrap_or("<none>"),
                        role = %record.role,
                        "role claim drifted from directory"
                    );
                    self.sync_claim(external_id, record.role).await;
                }
                Some(Resolution::authoritative(record.role))
            }
            Ok(None) => self.register(identity, phases).await,
            Err(error) => {
                warn!(%external_id, %error, "user lookup failed; degrading to guest");
                phases.advance(GuardPhase::Degraded);
                Some(Resolution::degraded())
            }
        }
    }

    async fn register(&self, identity: &Identity, phases: &mut PhaseLog) -> Option<Resolution> {
        let external_id = identity.external_id();
        let fields = NewUserRecord::for_identity(identity);
        info!(%external_id, name = %fields.name, "creating directory record for new user");

        let created = self.directory.create(&fields).await;
        if !self.still_signed_in_as(external_id) {
            return None;
        }
        match created {
            Ok(_) => {
                self.sync_claim(external_id, Role::Guest).await;
                Some(Resolution::authoritative(Role::Guest))
            }
            Err(error) => {
                warn!(%external_id, %error, "user creation failed; degrading to guest");
                phases.advance(GuardPhase::Degraded);
                Some(Resolution::degraded())
            }
        }
    }

    async fn sync_claim(&self, external_id: &ExternalUserId, role: Role) {
        match self
            .identity_provider
            .set_role_claim(external_id, role)
            .await
        {
            Ok(()) => debug!(%external_id, %role, "role claim updated"),
            Err(error) => {
                warn!(%external_id, %role, %error, "role claim update failed; will retry next run");
            }
        }
    }

    /// Check the visible screen against the role's screen set; an empty
    /// stack always needs its home.
    fn route_decision(&self, role: Role) -> RouteDecision {
        self.navigator
            .current()
            .map_or(RouteDecision::Redirect(Destination::for_role(role)), |screen| {
                RouteAccessPolicy.check(Some(role), screen.screen_set())
            })
    }

    fn still_signed_in_as(&self, external_id: &ExternalUserId) -> bool {
        self.session.current().is_signed_in_as(external_id)
    }

    fn cancelled(external_id: ExternalUserId) -> GuardOutcome {
        info!(%external_id, "session changed during role resolution; discarding result");
        GuardOutcome::Cancelled { external_id }
    }
}
