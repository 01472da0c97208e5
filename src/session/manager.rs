/*!
 * Audit Session Manager
 * Issues, rotates, revokes, and evaluates time-boxed bearer tokens
 */

use super::store::{MemoryStore, SessionStore, StoreError};
use super::token::SessionToken;
use super::types::{AuditPartyType, AuditSession};
use crate::core::{UserId, VesselId};
use crate::rules::FieldPattern;
use log::{debug, error, info};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;
use uuid::Uuid;

/// Result type for session administration
pub type SessionResult<T> = Result<T, SessionError>;

/// Session administration errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("invalid audit window: end must be after start")]
    InvalidWindow,

    #[error("session not found: {id}")]
    NotFound { id: Uuid },

    #[error("malformed redaction override {pattern:?}")]
    MalformedOverride { pattern: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parameters for creating a session
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub vessel_id: VesselId,
    pub party: AuditPartyType,
    pub label: String,
    pub start: SystemTime,
    pub end: SystemTime,
    pub visible_modules: HashMap<String, bool>,
    pub redaction_overrides: HashMap<String, bool>,
    pub created_by: UserId,
}

/// Admin-facing manager over the session store
///
/// Token rotation and revocation go through `SessionStore::apply`, whose
/// per-id exclusivity guarantees at most one valid token at any instant.
#[derive(Clone)]
pub struct AuditSessionManager {
    store: Arc<dyn SessionStore>,
}

impl AuditSessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Manager over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Create a session and issue its first token
    ///
    /// The returned session carries the token; hand it to the audit party
    /// now, it is not retrievable later in plain form from a real store.
    pub fn create(&self, params: CreateSession) -> SessionResult<AuditSession> {
        if params.end <= params.start {
            return Err(SessionError::InvalidWindow);
        }
        for pattern in params.redaction_overrides.keys() {
            if FieldPattern::parse(pattern).is_err() {
                return Err(SessionError::MalformedOverride {
                    pattern: pattern.clone(),
                });
            }
        }

        let session = AuditSession {
            id: Uuid::new_v4(),
            vessel_id: params.vessel_id,
            party: params.party,
            label: params.label,
            start: params.start,
            end: params.end,
            visible_modules: params.visible_modules,
            redaction_overrides: params.redaction_overrides,
            token: Some(SessionToken::generate()),
            active: true,
            created_by: params.created_by,
            created_at: SystemTime::now(),
        };
        self.store.insert(session.clone())?;
        info!(
            "created audit session {} for vessel {} ({:?})",
            session.id, session.vessel_id, session.party
        );
        Ok(session)
    }

    /// Atomically replace the session's token
    ///
    /// The old token stops validating the moment the store applies the
    /// swap; there is no window where both tokens work.
    pub fn regenerate(&self, id: Uuid) -> SessionResult<SessionToken> {
        let fresh = SessionToken::generate();
        let replacement = fresh.clone();
        let applied = self
            .store
            .apply(id, &mut |session| session.token = Some(replacement.clone()))?;
        if !applied {
            return Err(SessionError::NotFound { id });
        }
        info!("rotated token for audit session {id}");
        Ok(fresh)
    }

    /// Hard, immediate revoke: clears the token and flags the session
    /// inactive, independent of the time window
    pub fn deactivate(&self, id: Uuid) -> SessionResult<()> {
        let applied = self.store.apply(id, &mut |session| {
            session.active = false;
            session.token = None;
        })?;
        if !applied {
            return Err(SessionError::NotFound { id });
        }
        info!("deactivated audit session {id}");
        Ok(())
    }

    /// Validate a raw bearer token at `now`
    ///
    /// Fails closed: an unreachable store denies and raises an error-level
    /// alert instead of allowing. Token comparison is constant-time per
    /// candidate session.
    pub fn evaluate(&self, raw_token: &str, now: SystemTime) -> Option<AuditSession> {
        if raw_token.is_empty() {
            return None;
        }
        let sessions = match self.store.all() {
            Ok(sessions) => sessions,
            Err(err) => {
                error!("session store lookup failed, denying token: {err}");
                return None;
            }
        };
        let matched = sessions
            .into_iter()
            .find(|session| session.validates(raw_token, now));
        if matched.is_none() {
            debug!("no active session validated the presented token");
        }
        matched
    }

    /// Fetch one session by id
    pub fn get(&self, id: Uuid) -> SessionResult<Option<AuditSession>> {
        Ok(self.store.get(id)?)
    }

    /// List sessions for a vessel
    pub fn list_for_vessel(&self, vessel_id: &str) -> SessionResult<Vec<AuditSession>> {
        Ok(self.store.for_vessel(vessel_id)?)
    }

    /// List sessions whose grant is live at `now`
    pub fn active_at(&self, now: SystemTime) -> SessionResult<Vec<AuditSession>> {
        Ok(self
            .store
            .all()?
            .into_iter()
            .filter(|s| s.active && s.window_contains(now))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn window() -> (SystemTime, SystemTime) {
        let start = SystemTime::now() - Duration::from_secs(60);
        (start, start + Duration::from_secs(3_600))
    }

    fn params(start: SystemTime, end: SystemTime) -> CreateSession {
        CreateSession {
            vessel_id: "V1".to_string(),
            party: AuditPartyType::FlagState,
            label: "annual flag inspection".to_string(),
            start,
            end,
            visible_modules: HashMap::from([("safety".to_string(), true)]),
            redaction_overrides: HashMap::new(),
            created_by: "admin".to_string(),
        }
    }

    #[test]
    fn test_create_rejects_inverted_window() {
        let manager = AuditSessionManager::in_memory();
        let (start, _) = window();
        let err = manager.create(params(start, start)).unwrap_err();
        assert!(matches!(err, SessionError::InvalidWindow));
    }

    #[test]
    fn test_create_rejects_malformed_override() {
        let manager = AuditSessionManager::in_memory();
        let (start, end) = window();
        let mut p = params(start, end);
        p.redaction_overrides.insert("crew.*.salary".to_string(), true);
        let err = manager.create(p).unwrap_err();
        assert!(matches!(err, SessionError::MalformedOverride { .. }));
    }

    #[test]
    fn test_evaluate_valid_token() {
        let manager = AuditSessionManager::in_memory();
        let (start, end) = window();
        let session = manager.create(params(start, end)).unwrap();
        let raw = session.token.as_ref().unwrap().expose().to_string();

        let found = manager.evaluate(&raw, SystemTime::now()).unwrap();
        assert_eq!(found.id, session.id);
        assert!(manager.evaluate("", SystemTime::now()).is_none());
        assert!(manager.evaluate("bogus", SystemTime::now()).is_none());
    }

    #[test]
    fn test_regenerate_invalidates_old_token() {
        let manager = AuditSessionManager::in_memory();
        let (start, end) = window();
        let session = manager.create(params(start, end)).unwrap();
        let old = session.token.as_ref().unwrap().expose().to_string();

        let fresh = manager.regenerate(session.id).unwrap();
        let now = SystemTime::now();
        assert!(manager.evaluate(&old, now).is_none());
        assert!(manager.evaluate(fresh.expose(), now).is_some());
    }

    #[test]
    fn test_deactivate_revokes_immediately() {
        let manager = AuditSessionManager::in_memory();
        let (start, end) = window();
        let session = manager.create(params(start, end)).unwrap();
        let raw = session.token.as_ref().unwrap().expose().to_string();

        manager.deactivate(session.id).unwrap();
        assert!(manager.evaluate(&raw, SystemTime::now()).is_none());
        assert!(!manager.get(session.id).unwrap().unwrap().active);
    }

    #[test]
    fn test_not_found() {
        let manager = AuditSessionManager::in_memory();
        assert!(matches!(
            manager.regenerate(Uuid::new_v4()).unwrap_err(),
            SessionError::NotFound { .. }
        ));
        assert!(matches!(
            manager.deactivate(Uuid::new_v4()).unwrap_err(),
            SessionError::NotFound { .. }
        ));
    }
}
