//! User Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum Role {
    Citizen,
    Government,
    Worker,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Citizen, Role::Government, Role::Worker, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::Government => "government",
            Role::Worker => "worker",
            Role::Admin => "admin",
        }
    }

    /// Roles whose accounts are bound to a department
    pub fn is_departmental(&self) -> bool {
        matches!(self, Role::Government | Role::Worker)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "citizen" => Ok(Role::Citizen),
            "government" => Ok(Role::Government),
            "worker" => Ok(Role::Worker),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// User entity
///
/// `hash_pass` is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub hash_pass: String,
    pub role: Role,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub phone: Option<String>,
    /// Capability strings (e.g. ["assign_tasks", "generate_reports"])
    #[cfg_attr(feature = "db", sqlx(json))]
    pub permissions: Vec<String>,
    pub verified: bool,
    /// Supervising official (workers only)
    pub assigned_to: Option<i64>,
    pub aadhaar_number: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Self-registration payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub password: String,
    /// Defaults to citizen; anything else is rejected
    pub role: Option<Role>,
    pub phone: Option<String>,
    pub aadhaar_number: Option<String>,
    pub location: Option<String>,
}

/// Worker provisioning payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerCreate {
    pub name: String,
    pub username: String,
    pub password: String,
    pub phone: Option<String>,
    pub designation: Option<String>,
    /// Officials may only name their own department; admins must name one
    pub department: Option<String>,
    /// Supervising official, required when an admin provisions the worker
    pub supervisor_id: Option<i64>,
}

/// Official provisioning payload (admin only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OfficialCreate {
    pub name: String,
    pub username: String,
    pub password: String,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub phone: Option<String>,
    pub permissions: Option<Vec<String>>,
}

/// Profile update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub designation: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    /// Fields a user may change on their own profile
    pub const EDITABLE_FIELDS: &'static [&'static str] =
        &["name", "location", "designation", "phone", "avatar"];
}

/// Fully validated insert for the users table
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub hash_pass: String,
    pub role: Role,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub phone: Option<String>,
    pub permissions: Vec<String>,
    pub verified: bool,
    pub assigned_to: Option<i64>,
    pub aadhaar_number: Option<String>,
    pub location: Option<String>,
}

/// Per-role user counts
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleCounts {
    pub citizen: i64,
    pub government: i64,
    pub worker: i64,
    pub admin: i64,
}
