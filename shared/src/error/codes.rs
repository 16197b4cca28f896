//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: User errors
//! - 4xxx: Post errors
//! - 5xxx: Task errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a bare u16 so clients can switch on it without knowing
/// the Rust variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,
    /// Caller and resource belong to different departments
    DepartmentMismatch = 2004,
    /// Caller does not own the task
    NotTaskOwner = 2005,
    /// Only citizens may register themselves
    SelfRegistrationRestricted = 2006,
    /// Payload touches a field the caller may not edit
    FieldNotEditable = 2007,

    // ==================== 3xxx: User ====================
    /// User not found
    UserNotFound = 3001,
    /// Username already exists
    UsernameExists = 3002,
    /// Aadhaar number already registered
    AadhaarExists = 3003,
    /// Caller has no department on record
    DepartmentMissing = 3004,
    /// Referenced user is not a worker
    InvalidWorker = 3005,
    /// Supervisor is missing or not an official of the department
    SupervisorNotFound = 3006,
    /// Worker not found
    WorkerNotFound = 3007,

    // ==================== 4xxx: Post ====================
    /// Post not found
    PostNotFound = 4001,

    // ==================== 5xxx: Task ====================
    /// Task not found
    TaskNotFound = 5001,
    /// Worker belongs to another department than the assigning official
    WorkerDepartmentMismatch = 5002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::DepartmentMismatch => "Resource belongs to another department",
            ErrorCode::NotTaskOwner => "Task is not assigned to or by the current user",
            ErrorCode::SelfRegistrationRestricted => {
                "Only citizens can self-register. Government officials and workers must be created by an administrator"
            }
            ErrorCode::FieldNotEditable => "Field cannot be edited by the current user",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UsernameExists => "User already exists with this username",
            ErrorCode::AadhaarExists => "User already exists with this Aadhaar number",
            ErrorCode::DepartmentMissing => "Department information is missing",
            ErrorCode::InvalidWorker => "Invalid worker",
            ErrorCode::SupervisorNotFound => "Supervising official not found in department",
            ErrorCode::WorkerNotFound => "Worker not found",

            // Post
            ErrorCode::PostNotFound => "Post not found",

            // Task
            ErrorCode::TaskNotFound => "Task not found",
            ErrorCode::WorkerDepartmentMismatch => "Worker belongs to a different department",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),
            2004 => Ok(ErrorCode::DepartmentMismatch),
            2005 => Ok(ErrorCode::NotTaskOwner),
            2006 => Ok(ErrorCode::SelfRegistrationRestricted),
            2007 => Ok(ErrorCode::FieldNotEditable),

            // User
            3001 => Ok(ErrorCode::UserNotFound),
            3002 => Ok(ErrorCode::UsernameExists),
            3003 => Ok(ErrorCode::AadhaarExists),
            3004 => Ok(ErrorCode::DepartmentMissing),
            3005 => Ok(ErrorCode::InvalidWorker),
            3006 => Ok(ErrorCode::SupervisorNotFound),
            3007 => Ok(ErrorCode::WorkerNotFound),

            // Post
            4001 => Ok(ErrorCode::PostNotFound),

            // Task
            5001 => Ok(ErrorCode::TaskNotFound),
            5002 => Ok(ErrorCode::WorkerDepartmentMismatch),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
