/*!
 * Session Store
 * Persistence seam for audit sessions, with an in-memory implementation
 */

use super::types::AuditSession;
use ahash::RandomState;
use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
///
/// A production store talks to a database over the network; every failure
/// mode (timeout, connection loss, ambiguous reply) surfaces as
/// `Unavailable` and the caller fails closed.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("session store unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Persistence interface for audit sessions
///
/// Implementations own their timeout handling; blocking forever is not an
/// option for a networked store. `apply` must be linearizable per session
/// id so token rotation and deactivation never interleave.
pub trait SessionStore: Send + Sync {
    /// Insert a new session record
    fn insert(&self, session: AuditSession) -> StoreResult<()>;

    /// Fetch one session by id
    fn get(&self, id: Uuid) -> StoreResult<Option<AuditSession>>;

    /// Fetch all session records
    fn all(&self) -> StoreResult<Vec<AuditSession>>;

    /// Fetch sessions for one vessel
    fn for_vessel(&self, vessel_id: &str) -> StoreResult<Vec<AuditSession>> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|s| s.vessel_id == vessel_id)
            .collect())
    }

    /// Mutate one session under an exclusive per-id lock
    ///
    /// Returns `false` if the session does not exist.
    fn apply(
        &self,
        id: Uuid,
        mutate: &mut dyn FnMut(&mut AuditSession),
    ) -> StoreResult<bool>;
}

/// In-memory session store
///
/// `DashMap` entry locks give `apply` its per-id exclusivity.
pub struct MemoryStore {
    sessions: DashMap<Uuid, AuditSession, RandomState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::with_hasher(RandomState::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemoryStore {
    fn insert(&self, session: AuditSession) -> StoreResult<()> {
        self.sessions.insert(session.id, session);
        Ok(())
    }

    fn get(&self, id: Uuid) -> StoreResult<Option<AuditSession>> {
        Ok(self.sessions.get(&id).map(|entry| entry.clone()))
    }

    fn all(&self) -> StoreResult<Vec<AuditSession>> {
        Ok(self
            .sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    fn apply(
        &self,
        id: Uuid,
        mutate: &mut dyn FnMut(&mut AuditSession),
    ) -> StoreResult<bool> {
        match self.sessions.get_mut(&id) {
            Some(mut entry) => {
                mutate(entry.value_mut());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
