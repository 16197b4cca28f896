//! Capability Definitions
//!
//! Capabilities are stored on the user record and returned to clients;
//! route access itself is decided by the role matrix in [`super::policy`].

use shared::models::Role;

pub const CREATE_OFFICIALS: &str = "create_officials";
pub const CREATE_WORKERS: &str = "create_workers";
pub const ASSIGN_TASKS: &str = "assign_tasks";
pub const GENERATE_REPORTS: &str = "generate_reports";
pub const MANAGE_DEPARTMENTS: &str = "manage_departments";

/// Every capability a user may hold
pub const ALL_PERMISSIONS: &[&str] = &[
    CREATE_OFFICIALS,
    CREATE_WORKERS,
    ASSIGN_TASKS,
    GENERATE_REPORTS,
    MANAGE_DEPARTMENTS,
];

/// Capabilities of a newly provisioned official
pub const DEFAULT_OFFICIAL_PERMISSIONS: &[&str] = &[ASSIGN_TASKS, GENERATE_REPORTS];

/// Default capabilities for a role
pub fn default_permissions(role: Role) -> Vec<String> {
    let list: &[&str] = match role {
        Role::Admin => ALL_PERMISSIONS,
        Role::Government => DEFAULT_OFFICIAL_PERMISSIONS,
        Role::Citizen | Role::Worker => &[],
    };
    list.iter().map(|s| s.to_string()).collect()
}

/// Names in `requested` that are not known capabilities
pub fn unknown_permissions(requested: &[String]) -> Vec<&str> {
    requested
        .iter()
        .map(String::as_str)
        .filter(|p| !ALL_PERMISSIONS.contains(p))
        .collect()
}
