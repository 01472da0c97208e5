/*!
 * Role Catalog
 * The closed set of shipboard and shore roles, their priority order,
 * and helpers for multi-role actors
 */

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An actor role
///
/// The set is closed: new roles require a code change, unlike modules and
/// actions which live in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Superadmin,
    Dpa,
    FleetMaster,
    Captain,
    Purser,
    ChiefOfficer,
    ChiefEngineer,
    Hod,
    Officer,
    Crew,
    AuditorFlag,
    AuditorClass,
    TravelAgent,
    EmployerApi,
}

/// Roles in descending privilege order
///
/// `highest_role` scans this list front to back; keep it sorted by
/// privilege, not alphabetically.
pub const ROLE_PRIORITY: [Role; 14] = [
    Role::Superadmin,
    Role::Dpa,
    Role::FleetMaster,
    Role::Captain,
    Role::Purser,
    Role::ChiefOfficer,
    Role::ChiefEngineer,
    Role::Hod,
    Role::Officer,
    Role::Crew,
    Role::AuditorFlag,
    Role::AuditorClass,
    Role::TravelAgent,
    Role::EmployerApi,
];

impl Role {
    /// Canonical snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Dpa => "dpa",
            Role::FleetMaster => "fleet_master",
            Role::Captain => "captain",
            Role::Purser => "purser",
            Role::ChiefOfficer => "chief_officer",
            Role::ChiefEngineer => "chief_engineer",
            Role::Hod => "hod",
            Role::Officer => "officer",
            Role::Crew => "crew",
            Role::AuditorFlag => "auditor_flag",
            Role::AuditorClass => "auditor_class",
            Role::TravelAgent => "travel_agent",
            Role::EmployerApi => "employer_api",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Highest-privilege role in the set, per `ROLE_PRIORITY`
///
/// Returns `None` for an empty role set.
pub fn highest_role(roles: &[Role]) -> Option<Role> {
    ROLE_PRIORITY.iter().copied().find(|r| roles.contains(r))
}

/// Whether the actor can operate across the whole fleet
pub fn has_fleet_access(roles: &[Role]) -> bool {
    roles
        .iter()
        .any(|r| matches!(r, Role::Superadmin | Role::Dpa | Role::FleetMaster))
}

/// Whether the actor is a flag-state or class-society auditor
pub fn is_auditor(roles: &[Role]) -> bool {
    roles
        .iter()
        .any(|r| matches!(r, Role::AuditorFlag | Role::AuditorClass))
}

/// Whether the actor is any external (non-company) party
pub fn is_external_user(roles: &[Role]) -> bool {
    roles.iter().any(|r| {
        matches!(
            r,
            Role::AuditorFlag | Role::AuditorClass | Role::TravelAgent | Role::EmployerApi
        )
    })
}

/// Map a legacy free-form role name to a catalog role
///
/// Returns `None` for names the compatibility table does not know.
/// Lookup is case-insensitive and tolerates surrounding whitespace.
pub fn try_map_legacy_role(name: &str) -> Option<Role> {
    let normalized = name.trim().to_ascii_lowercase();
    let role = match normalized.as_str() {
        "superadmin" | "super_admin" => Role::Superadmin,
        "dpa" | "designated_person_ashore" => Role::Dpa,
        "fleet_master" | "fleet_manager" => Role::FleetMaster,
        "captain" | "master" => Role::Captain,
        "purser" => Role::Purser,
        "chief_officer" | "chief_mate" => Role::ChiefOfficer,
        "chief_engineer" => Role::ChiefEngineer,
        "hod" | "head_of_department" => Role::Hod,
        "officer" => Role::Officer,
        "crew" | "seafarer" | "rating" => Role::Crew,
        "auditor_flag" | "flag_auditor" => Role::AuditorFlag,
        "auditor_class" | "class_auditor" => Role::AuditorClass,
        "travel_agent" | "agency" => Role::TravelAgent,
        "employer_api" | "employer" => Role::EmployerApi,
        _ => return None,
    };
    Some(role)
}

/// Map a legacy role name, falling back to `crew` on unknown input
///
/// The fallback is deliberate: an unrecognized assignment must never grant
/// more than the lowest privilege. The downgrade is logged so it stays
/// visible in operations; callers needing to branch on it should use
/// `try_map_legacy_role`.
pub fn map_legacy_role(name: &str) -> Role {
    try_map_legacy_role(name).unwrap_or_else(|| {
        warn!("unknown legacy role {name:?}, defaulting to crew");
        Role::Crew
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highest_role_priority() {
        assert_eq!(
            highest_role(&[Role::Crew, Role::Captain]),
            Some(Role::Captain)
        );
        assert_eq!(
            highest_role(&[Role::EmployerApi, Role::Dpa, Role::Officer]),
            Some(Role::Dpa)
        );
        assert_eq!(highest_role(&[]), None);
    }

    #[test]
    fn test_fleet_access() {
        assert!(has_fleet_access(&[Role::Crew, Role::FleetMaster]));
        assert!(!has_fleet_access(&[Role::Captain, Role::Purser]));
    }

    #[test]
    fn test_auditor_and_external() {
        assert!(is_auditor(&[Role::AuditorClass]));
        assert!(!is_auditor(&[Role::TravelAgent]));
        assert!(is_external_user(&[Role::TravelAgent]));
        assert!(is_external_user(&[Role::AuditorFlag]));
        assert!(!is_external_user(&[Role::Captain, Role::Crew]));
    }

    #[test]
    fn test_legacy_mapping() {
        assert_eq!(map_legacy_role("master"), Role::Captain);
        assert_eq!(map_legacy_role("MASTER"), Role::Captain);
        assert_eq!(map_legacy_role("  chief_mate "), Role::ChiefOfficer);
        assert_eq!(map_legacy_role("head_of_department"), Role::Hod);
    }

    #[test]
    fn test_legacy_fallback_is_crew() {
        assert_eq!(try_map_legacy_role("unknown_role"), None);
        assert_eq!(map_legacy_role("unknown_role"), Role::Crew);
    }

    #[test]
    fn test_priority_covers_all_roles() {
        // Every serde round-trippable role must appear exactly once
        for role in ROLE_PRIORITY {
            assert_eq!(
                ROLE_PRIORITY.iter().filter(|r| **r == role).count(),
                1,
                "{role} duplicated in priority list"
            );
        }
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for role in ROLE_PRIORITY {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }
}
