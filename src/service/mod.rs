/*!
 * Authorization Service
 * Façade composing the audit gate, permission matrix, and context
 * restrictor into per-request decisions
 */

pub mod trail;

pub use trail::{DecisionEvent, DecisionSeverity, DecisionTrail, TrailStats};

use crate::config::{ConfigHandle, EngineConfig};
use crate::context::{ContextRestrictor, PermissionContext};
use crate::core::AuthzResult;
use crate::redaction;
use crate::roles::{self, Role};
use crate::session::AuditSession;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Outcome of a permission decision with its reasoning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub allowed: bool,
    pub reason: String,
    /// Role that granted access, when allowed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granted_by: Option<Role>,
}

impl Decision {
    fn allow(role: Role) -> Self {
        Self {
            allowed: true,
            reason: format!("granted by role '{role}'"),
            granted_by: Some(role),
        }
    }

    fn deny(module: &str, action: &str) -> Self {
        Self {
            allowed: false,
            reason: format!("no role grants '{module}.{action}' in this context"),
            granted_by: None,
        }
    }
}

/// The authorization façade
///
/// Evaluation reads a lock-free configuration snapshot, so concurrent
/// callers never contend; the decision trail is the only shared-write
/// surface and it is bounded.
#[derive(Clone)]
pub struct AuthorizationService {
    config: ConfigHandle,
    trail: Arc<DecisionTrail>,
}

impl AuthorizationService {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_handle(ConfigHandle::new(config))
    }

    pub fn with_handle(config: ConfigHandle) -> Self {
        Self {
            config,
            trail: Arc::new(DecisionTrail::new()),
        }
    }

    /// Handle for configuration reload
    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    /// The decision trail
    pub fn trail(&self) -> &DecisionTrail {
        &self.trail
    }

    /// Whether any of the actor's roles permits the action in context
    ///
    /// Disjunction across roles: each role runs the audit gate, the
    /// permission matrix, and the context restrictor in sequence; the
    /// first role passing all three grants access. Undeclared
    /// module/action is a caller error, not a denial.
    pub fn has_permission(
        &self,
        actor_roles: &[Role],
        module: &str,
        action: &str,
        ctx: &PermissionContext,
    ) -> AuthzResult<bool> {
        Ok(self.decide(actor_roles, module, action, ctx)?.allowed)
    }

    /// `has_permission` with the full decision value
    pub fn decide(
        &self,
        actor_roles: &[Role],
        module: &str,
        action: &str,
        ctx: &PermissionContext,
    ) -> AuthzResult<Decision> {
        let config = self.config.current();
        let restrictor = ContextRestrictor::new(&config.scope, &config.self_only_actions);

        // Surface matrix typos immediately rather than denying
        if !config.matrix.declares(module, action) {
            return Err(if config.matrix.module_names().contains(module) {
                crate::core::AuthzError::unknown_action(module, action)
            } else {
                crate::core::AuthzError::unknown_module(module)
            });
        }

        for role in actor_roles.iter().copied() {
            if !config.audit_rules.permits(role, module, action) {
                continue;
            }
            if !config.matrix.role_has_permission(role, module, action)? {
                continue;
            }
            if !restrictor.permits(role, action, ctx) {
                continue;
            }
            debug!("{module}.{action} granted via role {role}");
            return Ok(Decision::allow(role));
        }
        Ok(Decision::deny(module, action))
    }

    /// Decide and record the outcome on the decision trail
    pub fn decide_and_record(
        &self,
        actor_roles: &[Role],
        module: &str,
        action: &str,
        ctx: &PermissionContext,
    ) -> AuthzResult<Decision> {
        let decision = self.decide(actor_roles, module, action, ctx)?;
        self.trail.record(DecisionEvent::new(
            ctx.user_id.clone(),
            actor_roles,
            module,
            action,
            decision.allowed,
            decision.reason.clone(),
        ));
        Ok(decision)
    }

    /// Nominal capability map: every declared module/action some role of
    /// the actor is listed for and passes the audit gate on
    ///
    /// Context is deliberately not evaluated; this reports what the actor
    /// could do, not a specific grant.
    pub fn effective_permissions(
        &self,
        actor_roles: &[Role],
    ) -> BTreeMap<String, BTreeSet<String>> {
        let config = self.config.current();
        let mut effective: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (module, action, allowed) in config.matrix.iter() {
            let reachable = actor_roles.iter().any(|role| {
                allowed.contains(role) && config.audit_rules.permits(*role, module, action)
            });
            if reachable {
                effective
                    .entry(module.to_string())
                    .or_default()
                    .insert(action.to_string());
            }
        }
        effective
    }

    /// Whether a field path is redacted for a role
    pub fn is_field_redacted(&self, role: Role, path: &str) -> bool {
        let config = self.config.current();
        redaction::is_field_redacted(&config.audit_rules, role, path)
    }

    /// Redact a payload for a restricted role before it leaves the system
    pub fn redact(&self, payload: &Value, role: Role) -> Value {
        let config = self.config.current();
        redaction::redact_for_role(
            &config.audit_rules,
            &config.floor_redactions,
            role,
            payload,
        )
    }

    /// Redact a payload for a token-authenticated session viewer
    ///
    /// Applies the union of floor rules and the session's overrides;
    /// overrides can only add restrictions.
    pub fn redact_for_session(&self, payload: &Value, session: &AuditSession) -> Value {
        let config = self.config.current();
        let merged =
            redaction::merge_overrides(&config.floor_redactions, &session.redaction_overrides);
        redaction::redact(payload, &merged)
    }

    /// Highest-privilege role in the set
    pub fn highest_role(&self, actor_roles: &[Role]) -> Option<Role> {
        roles::highest_role(actor_roles)
    }

    pub fn has_fleet_access(&self, actor_roles: &[Role]) -> bool {
        roles::has_fleet_access(actor_roles)
    }

    pub fn is_auditor(&self, actor_roles: &[Role]) -> bool {
        roles::is_auditor(actor_roles)
    }

    pub fn is_external_user(&self, actor_roles: &[Role]) -> bool {
        roles::is_external_user(actor_roles)
    }

    /// Map a legacy role name, defaulting unknown input to `crew`
    pub fn map_legacy_role(&self, name: &str) -> Role {
        roles::map_legacy_role(name)
    }

    /// Current configuration snapshot, for admin introspection
    pub fn snapshot(&self) -> Arc<EngineConfig> {
        self.config.current()
    }
}

impl Default for AuthorizationService {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
