//! In-memory port doubles for role guard behaviour tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use client::domain::ports::{
    IdentityProvider, IdentityProviderError, SessionSource, UserDirectory, UserDirectoryError,
};
use client::domain::{ExternalUserId, Identity, NewUserRecord, Role, SessionState, UserRecord};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Session shared between the guard and the doubles that mutate it.
#[derive(Clone, Default)]
pub struct SharedSession(Arc<Mutex<SessionState>>);

impl SharedSession {
    pub fn set(&self, state: SessionState) {
        *lock(&self.0) = state;
    }

    pub fn current_identity(&self) -> Option<Identity> {
        lock(&self.0).identity().cloned()
    }

    pub fn sign_out(&self) {
        self.set(SessionState::SignedOut);
    }

    /// Mirror a provider-side claim write into the cached identity.
    fn apply_claim(&self, external_id: &ExternalUserId, role: Role) {
        let mut state = lock(&self.0);
        if let SessionState::SignedIn(identity) = &*state {
            if identity.external_id() == external_id {
                let updated = identity.clone().with_role_claim(role.as_claim_str());
                *state = SessionState::SignedIn(updated);
            }
        }
    }
}

impl SessionSource for SharedSession {
    fn current(&self) -> SessionState {
        lock(&self.0).clone()
    }
}

#[derive(Default)]
struct DirectoryState {
    records: HashMap<ExternalUserId, UserRecord>,
    lookup_failure: Option<UserDirectoryError>,
    sign_out_during_lookup: bool,
    lookups: usize,
    created: Vec<NewUserRecord>,
}

/// Directory double that yields once per call so overlapping runs interleave.
pub struct InMemoryDirectory {
    state: Mutex<DirectoryState>,
    session: SharedSession,
}

impl InMemoryDirectory {
    pub fn new(session: SharedSession) -> Self {
        Self {
            state: Mutex::new(DirectoryState::default()),
            session,
        }
    }

    pub fn insert(&self, record: UserRecord) {
        lock(&self.state)
            .records
            .insert(record.external_id.clone(), record);
    }

    pub fn fail_lookups_with(&self, error: UserDirectoryError) {
        lock(&self.state).lookup_failure = Some(error);
    }

    pub fn sign_out_during_lookup(&self) {
        lock(&self.state).sign_out_during_lookup = true;
    }

    pub fn lookups(&self) -> usize {
        lock(&self.state).lookups
    }

    pub fn created(&self) -> Vec<NewUserRecord> {
        lock(&self.state).created.clone()
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn lookup(
        &self,
        external_id: &ExternalUserId,
    ) -> Result<Option<UserRecord>, UserDirectoryError> {
        tokio::task::yield_now().await;
        let mut state = lock(&self.state);
        state.lookups += 1;
        if state.sign_out_during_lookup {
            self.session.sign_out();
        }
        if let Some(error) = state.lookup_failure.clone() {
            return Err(error);
        }
        Ok(state.records.get(external_id).cloned())
    }

    async fn create(&self, fields: &NewUserRecord) -> Result<UserRecord, UserDirectoryError> {
        tokio::task::yield_now().await;
        let mut state = lock(&self.state);
        if state.records.contains_key(&fields.external_id) {
            return Err(UserDirectoryError::conflict(fields.external_id.as_ref()));
        }
        let record = UserRecord {
            external_id: fields.external_id.clone(),
            email: fields.email.clone(),
            name: fields.name.clone(),
            phone: fields.phone.clone(),
            role: fields.role,
        };
        state.created.push(fields.clone());
        state
            .records
            .insert(record.external_id.clone(), record.clone());
        Ok(record)
    }
}

/// Identity provider double recording claim writes.
pub struct RecordingIdentityProvider {
    writes: Mutex<Vec<(ExternalUserId, Role)>>,
    session: SharedSession,
}

impl RecordingIdentityProvider {
    pub fn new(session: SharedSession) -> Self {
        Self {
            writes: Mutex::new(Vec::new()),
            session,
        }
    }

    pub fn writes(&self) -> Vec<(ExternalUserId, Role)> {
        lock(&self.writes).clone()
    }
}

#[async_trait]
impl IdentityProvider for RecordingIdentityProvider {
    async fn set_role_claim(
        &self,
        external_id: &ExternalUserId,
        role: Role,
    ) -> Result<(), IdentityProviderError> {
        lock(&self.writes).push((external_id.clone(), role));
        self.session.apply_claim(external_id, role);
        Ok(())
    }
}
