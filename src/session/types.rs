/*!
 * Audit Session Types
 * The persisted session record and its party classification
 */

use super::token::SessionToken;
use crate::core::{UserId, VesselId};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampSeconds};
use std::collections::HashMap;
use std::time::SystemTime;
use uuid::Uuid;

/// External party a session is issued to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditPartyType {
    FlagState,
    ClassSociety,
    PortState,
    Insurer,
}

/// A time-boxed, token-gated grant of scoped read-only access
///
/// Created by an admin action; mutated only through rotate/deactivate.
/// At most one token is valid at any instant.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSession {
    pub id: Uuid,
    pub vessel_id: VesselId,
    pub party: AuditPartyType,
    /// Human label, e.g. "MLC intermediate inspection 2026"
    pub label: String,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub start: SystemTime,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub end: SystemTime,
    /// Explicit module allow-list for this grant; absent modules are hidden
    pub visible_modules: HashMap<String, bool>,
    /// Extra redaction patterns; merged on top of the floor rules, never
    /// able to lift them
    pub redaction_overrides: HashMap<String, bool>,
    /// Current bearer token; `None` once deactivated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<SessionToken>,
    pub active: bool,
    pub created_by: UserId,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub created_at: SystemTime,
}

impl AuditSession {
    /// Whether `now` falls inside the half-open window `[start, end)`
    pub fn window_contains(&self, now: SystemTime) -> bool {
        self.start <= now && now < self.end
    }

    /// Whether a module is visible under this grant
    pub fn is_module_visible(&self, module: &str) -> bool {
        self.visible_modules.get(module).copied().unwrap_or(false)
    }

    /// Whether the supplied raw token currently validates this session
    pub fn validates(&self, raw: &str, now: SystemTime) -> bool {
        self.active
            && self.window_contains(now)
            && self.token.as_ref().is_some_and(|token| token.matches(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn session(start: SystemTime, end: SystemTime) -> AuditSession {
        AuditSession {
            id: Uuid::new_v4(),
            vessel_id: "V1".to_string(),
            party: AuditPartyType::FlagState,
            label: "annual".to_string(),
            start,
            end,
            visible_modules: HashMap::from([("safety".to_string(), true)]),
            redaction_overrides: HashMap::new(),
            token: Some(SessionToken::generate()),
            active: true,
            created_by: "admin".to_string(),
            created_at: start,
        }
    }

    #[test]
    fn test_window_is_half_open() {
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let end = start + Duration::from_secs(3_600);
        let s = session(start, end);

        assert!(s.window_contains(start));
        assert!(s.window_contains(end - Duration::from_secs(1)));
        assert!(!s.window_contains(end));
        assert!(!s.window_contains(start - Duration::from_secs(1)));
    }

    #[test]
    fn test_module_visibility_is_allow_list() {
        let start = SystemTime::UNIX_EPOCH;
        let s = session(start, start + Duration::from_secs(10));
        assert!(s.is_module_visible("safety"));
        assert!(!s.is_module_visible("payroll"));
    }

    #[test]
    fn test_expired_token_never_validates() {
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let end = start + Duration::from_secs(10);
        let s = session(start, end);
        let raw = s.token.as_ref().unwrap().expose().to_string();

        // Time expiry wins even while `active` is still true
        assert!(s.validates(&raw, start));
        assert!(!s.validates(&raw, end));
    }
}
