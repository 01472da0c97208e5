/*!
 * Scope Matrix
 * Per-role ceilings on fleet, vessel, department, self, and external access
 */

use crate::roles::{Role, ROLE_PRIORITY};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Breadth of access a role may ever reach within one scope axis
///
/// Levels form a total order except `AuditView`, which is a read-only
/// evidence tier that does not compare against the operational levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeLevel {
    Full,
    Admin,
    Read,
    Limited,
    Minimal,
    None,
    AuditView,
}

impl ScopeLevel {
    /// Position in the ordered vocabulary; `None` for the audit tier
    fn rank(self) -> Option<u8> {
        match self {
            ScopeLevel::Full => Some(5),
            ScopeLevel::Admin => Some(4),
            ScopeLevel::Read => Some(3),
            ScopeLevel::Limited => Some(2),
            ScopeLevel::Minimal => Some(1),
            ScopeLevel::None => Some(0),
            ScopeLevel::AuditView => None,
        }
    }

    /// Whether this level is at least `other` in the ordered vocabulary
    ///
    /// `AuditView` compares with nothing, including itself.
    pub fn at_least(self, other: ScopeLevel) -> bool {
        matches!(self.partial_cmp(&other), Some(Ordering::Greater | Ordering::Equal))
    }
}

impl PartialOrd for ScopeLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.rank()?.cmp(&other.rank()?))
    }
}

/// Scope ceilings for one role, one level per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeAccess {
    pub fleet: ScopeLevel,
    pub vessel: ScopeLevel,
    pub department: ScopeLevel,
    #[serde(rename = "self")]
    pub own: ScopeLevel,
    pub external: ScopeLevel,
}

impl ScopeAccess {
    /// All-none access, used as the fail-closed fallback for a role
    /// missing from the matrix (configuration validation rejects that
    /// state, so this is unreachable after a successful load)
    pub const NONE: ScopeAccess = ScopeAccess {
        fleet: ScopeLevel::None,
        vessel: ScopeLevel::None,
        department: ScopeLevel::None,
        own: ScopeLevel::None,
        external: ScopeLevel::None,
    };

    pub const fn new(
        fleet: ScopeLevel,
        vessel: ScopeLevel,
        department: ScopeLevel,
        own: ScopeLevel,
        external: ScopeLevel,
    ) -> Self {
        Self {
            fleet,
            vessel,
            department,
            own,
            external,
        }
    }
}

/// Immutable role → scope-ceiling table
///
/// Built once at startup; replaced wholesale on configuration reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeMatrix {
    entries: HashMap<Role, ScopeAccess>,
}

impl ScopeMatrix {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Set the ceiling row for a role, replacing any previous row
    pub fn set(&mut self, role: Role, access: ScopeAccess) -> &mut Self {
        self.entries.insert(role, access);
        self
    }

    /// Ceiling row for a role; fail-closed all-none if absent
    pub fn access(&self, role: Role) -> ScopeAccess {
        self.entries.get(&role).copied().unwrap_or(ScopeAccess::NONE)
    }

    /// Roles missing a ceiling row, for load-time validation
    pub fn missing_roles(&self) -> Vec<Role> {
        ROLE_PRIORITY
            .iter()
            .copied()
            .filter(|r| !self.entries.contains_key(r))
            .collect()
    }
}

impl Default for ScopeMatrix {
    fn default() -> Self {
        Self::new()
    }
}
