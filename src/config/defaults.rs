/*!
 * Built-in Configuration Tables
 * The shipped scope matrix, permission matrix, audit rules, self-only
 * action set, and floor redactions
 */

use super::EngineConfig;
use crate::matrix::PermissionMatrix;
use crate::roles::Role::*;
use crate::rules::{AuditRule, AuditRuleSet, DataScope, FieldPattern};
use crate::scope::{ScopeAccess, ScopeLevel, ScopeMatrix};
use crate::scope::ScopeLevel::{Admin, AuditView, Full, Limited, Minimal, Read};
use std::collections::HashSet;

/// The complete built-in configuration
pub fn engine_config() -> EngineConfig {
    EngineConfig {
        scope: scope_matrix(),
        matrix: permission_matrix(),
        audit_rules: audit_rules(),
        self_only_actions: self_only_actions(),
        floor_redactions: floor_redactions(),
    }
}

/// Per-role scope ceilings: fleet, vessel, department, self, external
pub fn scope_matrix() -> ScopeMatrix {
    let none = ScopeLevel::None;
    let mut m = ScopeMatrix::new();
    m.set(Superadmin, ScopeAccess::new(Full, Full, Full, Full, Full))
        .set(Dpa, ScopeAccess::new(Full, Full, Full, Full, Read))
        .set(FleetMaster, ScopeAccess::new(Full, Full, Full, Full, none))
        .set(Captain, ScopeAccess::new(Read, Admin, Admin, Full, none))
        .set(Purser, ScopeAccess::new(none, Admin, Admin, Full, none))
        .set(ChiefOfficer, ScopeAccess::new(none, Read, Full, Full, none))
        .set(ChiefEngineer, ScopeAccess::new(none, Read, Full, Full, none))
        .set(Hod, ScopeAccess::new(none, Read, Full, Full, none))
        .set(Officer, ScopeAccess::new(none, Read, Read, Full, none))
        .set(Crew, ScopeAccess::new(none, Limited, Minimal, Full, none))
        .set(
            AuditorFlag,
            ScopeAccess::new(none, AuditView, AuditView, none, AuditView),
        )
        .set(
            AuditorClass,
            ScopeAccess::new(none, AuditView, AuditView, none, AuditView),
        )
        .set(TravelAgent, ScopeAccess::new(none, Minimal, none, none, Limited))
        .set(EmployerApi, ScopeAccess::new(Minimal, Minimal, none, none, Read));
    m
}

/// Module × action → allowed roles
pub fn permission_matrix() -> PermissionMatrix {
    let mut m = PermissionMatrix::new();

    m.declare(
        "crew",
        "view",
        &[
            Superadmin, Dpa, FleetMaster, Captain, Purser, ChiefOfficer, ChiefEngineer, Hod,
            Officer, AuditorFlag, TravelAgent, EmployerApi,
        ],
    )
    .declare("crew", "create", &[Superadmin, Dpa, FleetMaster])
    .declare("crew", "edit", &[Superadmin, Dpa, FleetMaster, Captain, Purser])
    .declare("crew", "delete", &[Superadmin, Dpa])
    .declare(
        "crew",
        "view_roster",
        &[
            Superadmin, Dpa, FleetMaster, Captain, ChiefOfficer, ChiefEngineer, Hod, Officer,
        ],
    )
    .declare(
        "crew",
        "view_salary",
        &[Superadmin, Dpa, FleetMaster, Purser, Crew],
    )
    .declare(
        "crew",
        "view_medical",
        &[Superadmin, Dpa, Captain, Purser, Crew],
    )
    .declare("crew", "edit_own_limited_profile", &[Superadmin, Crew]);

    m.declare(
        "vessel",
        "view",
        &[
            Superadmin, Dpa, FleetMaster, Captain, Purser, ChiefOfficer, ChiefEngineer, Hod,
            Officer, Crew,
        ],
    )
    .declare("vessel", "create", &[Superadmin, FleetMaster])
    .declare("vessel", "edit", &[Superadmin, Dpa, FleetMaster, Captain])
    .declare("vessel", "delete", &[Superadmin])
    .declare(
        "vessel",
        "assign_crew",
        &[Superadmin, Dpa, FleetMaster, Captain],
    );

    m.declare(
        "documents",
        "view",
        &[
            Superadmin, Dpa, FleetMaster, Captain, Purser, ChiefOfficer, ChiefEngineer, Hod,
            Officer, Crew, AuditorFlag, AuditorClass, EmployerApi,
        ],
    )
    .declare(
        "documents",
        "upload",
        &[Superadmin, Dpa, FleetMaster, Captain, Purser, Officer],
    )
    .declare("documents", "verify", &[Superadmin, Dpa, FleetMaster])
    .declare("documents", "delete", &[Superadmin, Dpa]);

    m.declare("payroll", "view", &[Superadmin, Dpa, Purser])
        .declare("payroll", "edit", &[Superadmin, Purser])
        .declare("payroll", "approve", &[Superadmin, Dpa])
        .declare("payroll", "export", &[Superadmin, Dpa, Purser]);

    m.declare(
        "maintenance",
        "view",
        &[
            Superadmin, Dpa, FleetMaster, Captain, ChiefEngineer, Officer, AuditorClass,
        ],
    )
    .declare("maintenance", "create", &[Superadmin, Captain, ChiefEngineer])
    .declare("maintenance", "edit", &[Superadmin, ChiefEngineer])
    .declare("maintenance", "close", &[Superadmin, Captain, ChiefEngineer]);

    m.declare(
        "safety",
        "view",
        &[
            Superadmin, Dpa, FleetMaster, Captain, ChiefOfficer, ChiefEngineer, Hod, Officer,
            Crew, AuditorFlag, AuditorClass,
        ],
    )
    .declare(
        "safety",
        "report_incident",
        &[
            Superadmin, Captain, ChiefOfficer, ChiefEngineer, Hod, Officer, Crew,
        ],
    )
    .declare("safety", "edit", &[Superadmin, Dpa, Captain, ChiefOfficer])
    .declare("safety", "close_finding", &[Superadmin, Dpa, Captain]);

    m.declare(
        "training",
        "view",
        &[
            Superadmin, Dpa, FleetMaster, Captain, ChiefOfficer, ChiefEngineer, Hod, Officer,
            Crew, AuditorFlag,
        ],
    )
    .declare(
        "training",
        "assign",
        &[Superadmin, Dpa, FleetMaster, Captain, Hod],
    )
    .declare(
        "training",
        "record",
        &[Superadmin, Captain, ChiefOfficer, ChiefEngineer, Hod],
    );

    m.declare(
        "travel",
        "view",
        &[Superadmin, Dpa, FleetMaster, Captain, Purser, TravelAgent],
    )
    .declare("travel", "book", &[Superadmin, Purser, TravelAgent])
    .declare(
        "travel",
        "update_booking",
        &[Superadmin, Purser, TravelAgent],
    );

    m.declare("audit", "view_sessions", &[Superadmin, Dpa, FleetMaster])
        .declare("audit", "create_session", &[Superadmin, Dpa])
        .declare("audit", "revoke_session", &[Superadmin, Dpa]);

    m.declare("reports", "view", &[Superadmin, Dpa, FleetMaster, Captain])
        .declare("reports", "export", &[Superadmin, Dpa, FleetMaster]);

    m
}

/// Default restrictions for externally-restricted roles
pub fn audit_rules() -> AuditRuleSet {
    let mut rules = AuditRuleSet::new();

    rules.set(
        AuditorFlag,
        AuditRule::new(
            &["safety", "documents", "crew", "training"],
            &["view"],
            patterns(&[
                "crew.salary",
                "crew.bank_details.*",
                "crew.medical.*",
                "crew.passport_number",
                "maintenance.*",
                "payroll.*",
            ]),
            DataScope::ASSIGNED_AUDIT_PERIOD,
        )
        .with_rate_limit("120/hour"),
    );

    rules.set(
        AuditorClass,
        AuditRule::new(
            &["safety", "maintenance", "documents"],
            &["view"],
            patterns(&[
                "crew.salary",
                "crew.bank_details.*",
                "crew.medical.*",
                "crew.personal.*",
                "payroll.*",
            ]),
            DataScope::ASSIGNED_AUDIT_PERIOD,
        )
        .with_rate_limit("120/hour"),
    );

    rules.set(
        TravelAgent,
        AuditRule::new(
            &["crew", "travel"],
            &["view", "book", "update_booking"],
            patterns(&[
                "crew.salary",
                "crew.bank_details.*",
                "crew.medical.*",
                "crew.performance.*",
            ]),
            DataScope::UNRESTRICTED,
        ),
    );

    rules.set(
        EmployerApi,
        AuditRule::new(
            &["crew", "documents"],
            &["view"],
            patterns(&[
                "crew.medical.*",
                "crew.bank_details.*",
                "crew.next_of_kin.*",
            ]),
            DataScope::UNRESTRICTED,
        )
        .with_rate_limit("1000/day"),
    );

    rules
}

/// Sensitive actions crew may only perform on their own record
pub fn self_only_actions() -> HashSet<String> {
    ["edit_own_limited_profile", "view_salary", "view_medical"]
        .iter()
        .map(|a| a.to_string())
        .collect()
}

/// Redactions no session override can lift: medical data is always
/// anonymized for external viewers
pub fn floor_redactions() -> Vec<FieldPattern> {
    patterns(&["crew.medical.*"])
}

fn patterns(raw: &[&str]) -> Vec<FieldPattern> {
    raw.iter()
        .map(|p| match FieldPattern::parse(p) {
            Ok(pattern) => pattern,
            // Built-in tables are covered by tests; a bad literal here is
            // a programming error, not runtime input
            Err(err) => panic!("invalid built-in pattern: {err}"),
        })
        .collect()
}
