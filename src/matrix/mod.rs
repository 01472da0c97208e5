/*!
 * Permission Matrix
 * Static module × action → allowed-roles table
 *
 * Modules and actions are open string sets supplied by configuration;
 * roles are the closed catalog enum. Unknown module/action lookups are
 * caller errors, not denials, so matrix typos surface in tests instead
 * of silently denying.
 */

use crate::core::{AuthzError, AuthzResult};
use crate::roles::Role;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Immutable permission table
///
/// `BTreeMap` keeps iteration deterministic, which `effective_permissions`
/// and config round-trips rely on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMatrix {
    modules: BTreeMap<String, BTreeMap<String, HashSet<Role>>>,
}

impl PermissionMatrix {
    pub fn new() -> Self {
        Self {
            modules: BTreeMap::new(),
        }
    }

    /// Declare an action under a module with its allowed roles
    pub fn declare(
        &mut self,
        module: impl Into<String>,
        action: impl Into<String>,
        roles: &[Role],
    ) -> &mut Self {
        self.modules
            .entry(module.into())
            .or_default()
            .insert(action.into(), roles.iter().copied().collect());
        self
    }

    /// Whether `module`/`action` is declared at all
    pub fn declares(&self, module: &str, action: &str) -> bool {
        self.modules
            .get(module)
            .is_some_and(|actions| actions.contains_key(action))
    }

    /// Whether `role` is allowed `action` on `module`
    ///
    /// Undeclared module or action is an `InvalidArgument` error.
    pub fn role_has_permission(
        &self,
        role: Role,
        module: &str,
        action: &str,
    ) -> AuthzResult<bool> {
        let actions = self
            .modules
            .get(module)
            .ok_or_else(|| AuthzError::unknown_module(module))?;
        let roles = actions
            .get(action)
            .ok_or_else(|| AuthzError::unknown_action(module, action))?;
        Ok(roles.contains(&role))
    }

    /// Declared allowed-role set, or empty if undeclared
    pub fn roles_for_action(&self, module: &str, action: &str) -> HashSet<Role> {
        self.modules
            .get(module)
            .and_then(|actions| actions.get(action))
            .cloned()
            .unwrap_or_default()
    }

    /// Iterate every declared `(module, action, roles)` triple
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &HashSet<Role>)> {
        self.modules.iter().flat_map(|(module, actions)| {
            actions
                .iter()
                .map(move |(action, roles)| (module.as_str(), action.as_str(), roles))
        })
    }

    /// Declared module names
    pub fn module_names(&self) -> BTreeSet<&str> {
        self.modules.keys().map(String::as_str).collect()
    }

    /// Union of all declared action names across modules
    pub fn action_names(&self) -> BTreeSet<&str> {
        self.modules
            .values()
            .flat_map(|actions| actions.keys().map(String::as_str))
            .collect()
    }

    /// Declared `(module, action)` pairs with an empty role set
    ///
    /// An empty set is almost always a config typo; validation rejects it.
    pub fn empty_declarations(&self) -> Vec<(String, String)> {
        self.iter()
            .filter(|(_, _, roles)| roles.is_empty())
            .map(|(m, a, _)| (m.to_string(), a.to_string()))
            .collect()
    }
}

impl Default for PermissionMatrix {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PermissionMatrix {
        let mut matrix = PermissionMatrix::new();
        matrix
            .declare("crew", "view", &[Role::Captain, Role::Purser])
            .declare("crew", "edit", &[Role::Captain])
            .declare("vessel", "view", &[Role::Captain, Role::Crew]);
        matrix
    }

    #[test]
    fn test_role_has_permission() {
        let matrix = sample();
        assert!(matrix
            .role_has_permission(Role::Captain, "crew", "view")
            .unwrap());
        assert!(!matrix
            .role_has_permission(Role::Crew, "crew", "view")
            .unwrap());
    }

    #[test]
    fn test_unknown_module_is_error() {
        let matrix = sample();
        let err = matrix
            .role_has_permission(Role::Captain, "cargo", "view")
            .unwrap_err();
        assert!(matches!(err, AuthzError::InvalidArgument { .. }));

        let err = matrix
            .role_has_permission(Role::Captain, "crew", "teleport")
            .unwrap_err();
        assert!(matches!(err, AuthzError::InvalidArgument { .. }));
    }

    #[test]
    fn test_roles_for_action_matches_membership() {
        let matrix = sample();
        for (module, action, _) in matrix.iter() {
            let declared = matrix.roles_for_action(module, action);
            for role in crate::roles::ROLE_PRIORITY {
                assert_eq!(
                    matrix.role_has_permission(role, module, action).unwrap(),
                    declared.contains(&role)
                );
            }
        }
    }

    #[test]
    fn test_roles_for_undeclared_action_is_empty() {
        let matrix = sample();
        assert!(matrix.roles_for_action("cargo", "view").is_empty());
    }

    #[test]
    fn test_empty_declarations_detected() {
        let mut matrix = sample();
        matrix.declare("payroll", "approve", &[]);
        assert_eq!(
            matrix.empty_declarations(),
            vec![("payroll".to_string(), "approve".to_string())]
        );
    }
}
