/*!
 * Audit Rule Set
 * Default restrictions for externally-restricted roles: module/action
 * allow-lists, field-redaction patterns, data-scope descriptor, and an
 * optional rate limit
 */

pub mod pattern;

pub use pattern::{any_match, FieldPattern, PatternError};

use crate::roles::Role;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Which vessels a restricted role may see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VesselScope {
    /// Only vessels assigned for the audit engagement
    AssignedOnly,
    All,
}

/// Which date range a restricted role may see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    /// Only records inside the agreed audit period
    AuditPeriodOnly,
    All,
}

/// Data-scope descriptor attached to a rule
///
/// The engine carries this for callers building queries; it is not
/// evaluated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataScope {
    pub vessels: VesselScope,
    pub dates: DateRange,
}

impl DataScope {
    pub const ASSIGNED_AUDIT_PERIOD: DataScope = DataScope {
        vessels: VesselScope::AssignedOnly,
        dates: DateRange::AuditPeriodOnly,
    };

    pub const UNRESTRICTED: DataScope = DataScope {
        vessels: VesselScope::All,
        dates: DateRange::All,
    };
}

/// Default restriction for one externally-restricted role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRule {
    pub allowed_modules: HashSet<String>,
    pub allowed_actions: HashSet<String>,
    pub redacted_fields: Vec<FieldPattern>,
    pub data_scope: DataScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<String>,
}

impl AuditRule {
    pub fn new(
        allowed_modules: &[&str],
        allowed_actions: &[&str],
        redacted_fields: Vec<FieldPattern>,
        data_scope: DataScope,
    ) -> Self {
        Self {
            allowed_modules: allowed_modules.iter().map(|m| m.to_string()).collect(),
            allowed_actions: allowed_actions.iter().map(|a| a.to_string()).collect(),
            redacted_fields,
            data_scope,
            rate_limit: None,
        }
    }

    pub fn with_rate_limit(mut self, rate_limit: impl Into<String>) -> Self {
        self.rate_limit = Some(rate_limit.into());
        self
    }
}

/// Per-role default restrictions
///
/// Only roles present here are restricted by default; absent roles bypass
/// the gate entirely and answer to the permission matrix and context
/// restrictor alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditRuleSet {
    rules: HashMap<Role, AuditRule>,
}

impl AuditRuleSet {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    pub fn set(&mut self, role: Role, rule: AuditRule) -> &mut Self {
        self.rules.insert(role, rule);
        self
    }

    /// Whether the role is restricted by default
    pub fn is_restricted(&self, role: Role) -> bool {
        self.rules.contains_key(&role)
    }

    pub fn rule(&self, role: Role) -> Option<&AuditRule> {
        self.rules.get(&role)
    }

    /// Iterate restricted roles and their rules
    pub fn iter(&self) -> impl Iterator<Item = (Role, &AuditRule)> {
        self.rules.iter().map(|(role, rule)| (*role, rule))
    }

    /// Gate applied before the permission matrix
    ///
    /// Restricted roles must name both the module and the action in their
    /// allow-lists; unrestricted roles pass through.
    pub fn permits(&self, role: Role, module: &str, action: &str) -> bool {
        match self.rules.get(&role) {
            None => true,
            Some(rule) => {
                let allowed = rule.allowed_modules.contains(module)
                    && rule.allowed_actions.contains(action);
                if !allowed {
                    debug!("audit gate rejected {role} for {module}.{action}");
                }
                allowed
            }
        }
    }
}

impl Default for AuditRuleSet {
    fn default() -> Self {
        Self::new()
    }
}
