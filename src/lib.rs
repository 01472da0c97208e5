/*!
 * Fleetgate
 * Authorization and audit-redaction policy engine for maritime fleet
 * management
 *
 * Given an actor's role set and a request context, the engine decides
 * whether an action is permitted, and — independently — which fields of a
 * returned payload must be masked before reaching a restricted viewer
 * (external auditors, employer APIs, travel agents).
 *
 * ## Usage
 * ```
 * use fleetgate::{AuthorizationService, PermissionContext, Role};
 *
 * let service = AuthorizationService::default();
 * let ctx = PermissionContext::for_user("usr-1").with_self(true);
 *
 * let allowed = service
 *     .has_permission(&[Role::Crew], "crew", "view_salary", &ctx)
 *     .unwrap();
 * assert!(allowed);
 * ```
 */

pub mod config;
pub mod context;
pub mod core;
pub mod matrix;
pub mod redaction;
pub mod roles;
pub mod rules;
pub mod scope;
pub mod service;
pub mod session;

// Re-exports
pub use config::{ConfigError, ConfigHandle, EngineConfig};
pub use context::{ContextRestrictor, PermissionContext};
pub use self::core::{AuthzError, AuthzResult};
pub use matrix::PermissionMatrix;
pub use redaction::{anonymize_name, REDACTED_SENTINEL};
pub use roles::{
    has_fleet_access, highest_role, is_auditor, is_external_user, map_legacy_role,
    try_map_legacy_role, Role, ROLE_PRIORITY,
};
pub use rules::{AuditRule, AuditRuleSet, DataScope, FieldPattern, PatternError};
pub use scope::{ScopeAccess, ScopeLevel, ScopeMatrix};
pub use service::{AuthorizationService, Decision, DecisionEvent, DecisionTrail};
pub use session::{
    AuditPartyType, AuditSession, AuditSessionManager, CreateSession, MemoryStore, SessionError,
    SessionStore, SessionToken, StoreError,
};
