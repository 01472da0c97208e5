/*!
 * Permission Context and Context Restrictor
 * Per-request facts and the scope-based denial rules evaluated against them
 */

use crate::core::{CompanyId, DepartmentId, UserId, VesselId};
use crate::roles::Role;
use crate::scope::{ScopeLevel, ScopeMatrix};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Departments with a fixed ceiling for the senior department heads
pub const DECK_DEPARTMENT: &str = "Deck";
pub const ENGINE_DEPARTMENT: &str = "Engine";

/// Evaluation-time facts for one request
///
/// Supplied fresh per call by the caller; never persisted by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionContext {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<CompanyId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vessel_id: Option<VesselId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<DepartmentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_vessel_id: Option<VesselId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_department: Option<DepartmentId>,
    #[serde(default)]
    pub is_self: bool,
}

impl PermissionContext {
    pub fn for_user(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn with_target_user(mut self, target: impl Into<UserId>) -> Self {
        self.target_user_id = Some(target.into());
        self
    }

    pub fn with_vessel(mut self, vessel: impl Into<VesselId>) -> Self {
        self.vessel_id = Some(vessel.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<DepartmentId>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_target_vessel(mut self, vessel: impl Into<VesselId>) -> Self {
        self.target_vessel_id = Some(vessel.into());
        self
    }

    pub fn with_target_department(mut self, department: impl Into<DepartmentId>) -> Self {
        self.target_department = Some(department.into());
        self
    }

    pub fn with_self(mut self, is_self: bool) -> Self {
        self.is_self = is_self;
        self
    }

    /// Whether the request targets the actor's own record
    pub fn targets_self(&self) -> bool {
        self.is_self
            || self
                .target_user_id
                .as_ref()
                .is_some_and(|target| *target == self.user_id)
    }
}

/// Department ceiling resolved for a role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DepartmentCeiling {
    /// Confined to a named department
    Fixed(&'static str),
    /// Confined to the actor's own department from the context
    Own,
}

/// Scope-based denial rules, applied only after the permission matrix
/// already grants the role/module/action combination
#[derive(Debug, Clone, Copy)]
pub struct ContextRestrictor<'a> {
    scope: &'a ScopeMatrix,
    self_only_actions: &'a HashSet<String>,
}

impl<'a> ContextRestrictor<'a> {
    pub fn new(scope: &'a ScopeMatrix, self_only_actions: &'a HashSet<String>) -> Self {
        Self {
            scope,
            self_only_actions,
        }
    }

    /// Whether the context permits the already-granted action
    pub fn permits(&self, role: Role, action: &str, ctx: &PermissionContext) -> bool {
        if !self.permits_self_only(role, action, ctx) {
            debug!("self-only action {action} denied for {role}");
            return false;
        }
        if !self.permits_vessel(role, ctx) {
            debug!(
                "vessel ceiling denied {role}: target {:?} outside {:?}",
                ctx.target_vessel_id, ctx.vessel_id
            );
            return false;
        }
        if !self.permits_department(role, ctx) {
            debug!(
                "department ceiling denied {role}: target {:?}",
                ctx.target_department
            );
            return false;
        }
        true
    }

    /// Sensitive actions crew may only perform on their own record
    fn permits_self_only(&self, role: Role, action: &str, ctx: &PermissionContext) -> bool {
        if role != Role::Crew || !self.self_only_actions.contains(action) {
            return true;
        }
        ctx.targets_self()
    }

    /// Roles with real but sub-fleet vessel access are pinned to their own
    /// vessel; a differing target vessel is a denial
    fn permits_vessel(&self, role: Role, ctx: &PermissionContext) -> bool {
        let access = self.scope.access(role);
        let pinned = access.fleet != ScopeLevel::Full
            && access.vessel != ScopeLevel::Full
            && access.vessel.at_least(ScopeLevel::Read);
        if !pinned {
            return true;
        }
        match (&ctx.target_vessel_id, &ctx.vessel_id) {
            (Some(target), Some(own)) => target == own,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }

    /// Department heads with full department scope on a single vessel are
    /// confined to their department
    fn permits_department(&self, role: Role, ctx: &PermissionContext) -> bool {
        let access = self.scope.access(role);
        if access.department != ScopeLevel::Full || access.vessel == ScopeLevel::Full {
            return true;
        }
        let ceiling = match role {
            Role::ChiefOfficer => DepartmentCeiling::Fixed(DECK_DEPARTMENT),
            Role::ChiefEngineer => DepartmentCeiling::Fixed(ENGINE_DEPARTMENT),
            _ => DepartmentCeiling::Own,
        };
        let Some(target) = &ctx.target_department else {
            return true;
        };
        match ceiling {
            DepartmentCeiling::Fixed(department) => target == department,
            DepartmentCeiling::Own => ctx.department.as_ref() == Some(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ScopeAccess;

    fn scope() -> ScopeMatrix {
        let mut matrix = ScopeMatrix::new();
        matrix
            .set(
                Role::Dpa,
                ScopeAccess::new(
                    ScopeLevel::Full,
                    ScopeLevel::Full,
                    ScopeLevel::Full,
                    ScopeLevel::Full,
                    ScopeLevel::Read,
                ),
            )
            .set(
                Role::Captain,
                ScopeAccess::new(
                    ScopeLevel::Read,
                    ScopeLevel::Admin,
                    ScopeLevel::Admin,
                    ScopeLevel::Full,
                    ScopeLevel::None,
                ),
            )
            .set(
                Role::ChiefEngineer,
                ScopeAccess::new(
                    ScopeLevel::None,
                    ScopeLevel::Read,
                    ScopeLevel::Full,
                    ScopeLevel::Full,
                    ScopeLevel::None,
                ),
            )
            .set(
                Role::Hod,
                ScopeAccess::new(
                    ScopeLevel::None,
                    ScopeLevel::Read,
                    ScopeLevel::Full,
                    ScopeLevel::Full,
                    ScopeLevel::None,
                ),
            )
            .set(
                Role::Crew,
                ScopeAccess::new(
                    ScopeLevel::None,
                    ScopeLevel::Limited,
                    ScopeLevel::Minimal,
                    ScopeLevel::Full,
                    ScopeLevel::None,
                ),
            );
        matrix
    }

    fn self_only() -> HashSet<String> {
        ["view_salary", "view_medical"]
            .iter()
            .map(|a| a.to_string())
            .collect()
    }

    #[test]
    fn test_crew_self_only_action() {
        let scope = scope();
        let self_only = self_only();
        let restrictor = ContextRestrictor::new(&scope, &self_only);

        let own = PermissionContext::for_user("A").with_self(true);
        assert!(restrictor.permits(Role::Crew, "view_salary", &own));

        let same_target = PermissionContext::for_user("A").with_target_user("A");
        assert!(restrictor.permits(Role::Crew, "view_salary", &same_target));

        let other = PermissionContext::for_user("A").with_target_user("B");
        assert!(!restrictor.permits(Role::Crew, "view_salary", &other));

        // Only crew is subject to the self-only family
        assert!(restrictor.permits(Role::Captain, "view_salary", &other));
    }

    #[test]
    fn test_vessel_ceiling() {
        let scope = scope();
        let self_only = self_only();
        let restrictor = ContextRestrictor::new(&scope, &self_only);

        let cross_vessel = PermissionContext::for_user("A")
            .with_vessel("V1")
            .with_target_vessel("V2");
        assert!(!restrictor.permits(Role::Captain, "view", &cross_vessel));
        assert!(restrictor.permits(Role::Dpa, "view", &cross_vessel));

        let own_vessel = PermissionContext::for_user("A")
            .with_vessel("V1")
            .with_target_vessel("V1");
        assert!(restrictor.permits(Role::Captain, "view", &own_vessel));

        // No target vessel set: ceiling does not apply
        let untargeted = PermissionContext::for_user("A").with_vessel("V1");
        assert!(restrictor.permits(Role::Captain, "view", &untargeted));
    }

    #[test]
    fn test_department_ceiling_fixed() {
        let scope = scope();
        let self_only = self_only();
        let restrictor = ContextRestrictor::new(&scope, &self_only);

        let engine = PermissionContext::for_user("A").with_target_department(ENGINE_DEPARTMENT);
        let deck = PermissionContext::for_user("A").with_target_department(DECK_DEPARTMENT);

        assert!(restrictor.permits(Role::ChiefEngineer, "view", &engine));
        assert!(!restrictor.permits(Role::ChiefEngineer, "view", &deck));
    }

    #[test]
    fn test_department_ceiling_own() {
        let scope = scope();
        let self_only = self_only();
        let restrictor = ContextRestrictor::new(&scope, &self_only);

        let own = PermissionContext::for_user("A")
            .with_department("Galley")
            .with_target_department("Galley");
        assert!(restrictor.permits(Role::Hod, "view", &own));

        let other = PermissionContext::for_user("A")
            .with_department("Galley")
            .with_target_department(DECK_DEPARTMENT);
        assert!(!restrictor.permits(Role::Hod, "view", &other));
    }

    #[test]
    fn test_crew_not_pinned_by_vessel_ceiling() {
        let scope = scope();
        let self_only = self_only();
        let restrictor = ContextRestrictor::new(&scope, &self_only);

        // Crew's vessel level is below Read, so the vessel ceiling family
        // does not apply; crew access is governed by the self-only rules
        let ctx = PermissionContext::for_user("A")
            .with_vessel("V1")
            .with_target_vessel("V2");
        assert!(restrictor.permits(Role::Crew, "view", &ctx));
    }
}
