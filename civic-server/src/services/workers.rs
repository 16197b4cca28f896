//! Worker provisioning and directory

use shared::error::ErrorCode;
use shared::models::{NewUser, Role, User, WorkerCreate};
use sqlx::SqlitePool;

use crate::audit_log;
use crate::auth::CurrentUser;
use crate::auth::permissions::default_permissions;
use crate::auth::policy::require_department;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, require_present, validate_optional_text, validate_password,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

fn department_mismatch(caller: &CurrentUser, own: &str, requested: &str) -> AppError {
    security_log!(
        WARN,
        "department_mismatch",
        user_id = caller.id,
        own_department = own,
        requested_department = requested
    );
    AppError::with_message(
        ErrorCode::DepartmentMismatch,
        format!("You can only manage workers in the {own} department"),
    )
}

/// Provision a worker account
///
/// Officials create workers in their own department and supervise them.
/// Admins name both the department and a supervising official from it.
pub async fn create(pool: &SqlitePool, caller: &CurrentUser, req: WorkerCreate) -> AppResult<User> {
    let (department, supervisor_id) = match caller.role {
        Role::Government => {
            let own = require_department(pool, caller).await?;
            if let Some(requested) = req.department.as_deref().map(str::trim)
                && !requested.is_empty()
                && requested != own
            {
                return Err(department_mismatch(caller, &own, requested));
            }
            (own, caller.id)
        }
        Role::Admin => {
            let department = require_present(&req.department, "department", MAX_SHORT_TEXT_LEN)?;
            let supervisor_id = req
                .supervisor_id
                .ok_or_else(|| AppError::required("supervisor_id"))?;
            let supervises = user::find_by_id(pool, supervisor_id).await?.is_some_and(|s| {
                s.role == Role::Government && s.department.as_deref() == Some(department.as_str())
            });
            if !supervises {
                return Err(AppError::new(ErrorCode::SupervisorNotFound)
                    .with_detail("supervisor_id", supervisor_id)
                    .with_detail("department", department));
            }
            (department, supervisor_id)
        }
        Role::Citizen | Role::Worker => {
            return Err(AppError::forbidden("Only officials and admins can create workers"));
        }
    };

    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&req.username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_password(&req.password)?;
    let designation = require_present(&req.designation, "designation", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let username = req.username.trim().to_string();
    if user::username_exists(pool, &username).await? {
        return Err(AppError::new(ErrorCode::UsernameExists).with_detail("field", "username"));
    }

    let created = user::create(
        pool,
        NewUser {
            name: req.name.trim().to_string(),
            username,
            hash_pass: crate::auth::password::hash_password(&req.password)?,
            role: Role::Worker,
            department: Some(department.clone()),
            designation: Some(designation),
            phone: req.phone,
            permissions: default_permissions(Role::Worker),
            verified: true,
            assigned_to: Some(supervisor_id),
            aadhaar_number: None,
            location: None,
        },
    )
    .await?;

    audit_log!(
        caller.id,
        "worker_created",
        format!("user:{}", created.id),
        format!("department={department}")
    );
    Ok(created)
}

/// Workers of the caller's department; admins may pick one or see all
pub async fn list(
    pool: &SqlitePool,
    caller: &CurrentUser,
    department: Option<&str>,
) -> AppResult<Vec<User>> {
    let scope = match caller.role {
        Role::Admin => department.map(str::to_string),
        _ => Some(require_department(pool, caller).await?),
    };
    Ok(user::find_by_role(pool, Role::Worker, scope.as_deref()).await?)
}

/// One worker; officials only see their own department
pub async fn get(pool: &SqlitePool, caller: &CurrentUser, id: i64) -> AppResult<User> {
    let worker = user::find_by_id(pool, id)
        .await?
        .filter(|u| u.role == Role::Worker)
        .ok_or_else(|| AppError::new(ErrorCode::WorkerNotFound))?;

    if caller.role == Role::Government {
        let own = require_department(pool, caller).await?;
        let theirs = worker.department.as_deref().unwrap_or_default();
        if theirs != own {
            return Err(department_mismatch(caller, &own, theirs));
        }
    }
    Ok(worker)
}
