//! Account workflows: registration, login, profiles, official provisioning

use serde_json::{Map, Value};
use shared::client::{AuthResponse, LoginRequest, SystemStats};
use shared::error::ErrorCode;
use shared::models::{NewUser, OfficialCreate, ProfileUpdate, RegisterRequest, Role, User};
use sqlx::SqlitePool;

use crate::audit_log;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::permissions::{default_permissions, unknown_permissions};
use crate::auth::{CurrentUser, JwtService};
use crate::core::BootstrapAdmin;
use crate::db::repository::{post, task, user};
use crate::security_log;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, disallowed_fields,
    require_present, validate_aadhaar, validate_optional_text, validate_password,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

fn issue(jwt: &JwtService, user: User) -> AppResult<AuthResponse> {
    let token = jwt
        .generate_token(&user)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;
    Ok(AuthResponse { token, user })
}

/// Username must be free; checked before insert for a precise error
async fn ensure_username_free(pool: &SqlitePool, username: &str) -> AppResult<()> {
    if user::username_exists(pool, username).await? {
        return Err(AppError::new(ErrorCode::UsernameExists).with_detail("field", "username"));
    }
    Ok(())
}

/// Shared checks for name, username and password
fn validate_credentials(name: &str, username: &str, password: &str) -> AppResult<()> {
    validate_required_text(name, "name", MAX_NAME_LEN)?;
    validate_required_text(username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_password(password)
}

/// Citizen self-registration
///
/// Any role other than citizen is refused before the payload is looked at.
pub async fn register(
    pool: &SqlitePool,
    jwt: &JwtService,
    req: RegisterRequest,
) -> AppResult<AuthResponse> {
    let role = req.role.unwrap_or(Role::Citizen);
    if role != Role::Citizen {
        security_log!(
            WARN,
            "self_registration_refused",
            username = req.username,
            role = role
        );
        return Err(AppError::new(ErrorCode::SelfRegistrationRestricted));
    }

    validate_credentials(&req.name, &req.username, &req.password)?;
    let aadhaar = require_present(&req.aadhaar_number, "aadhaar_number", MAX_SHORT_TEXT_LEN)?;
    validate_aadhaar(&aadhaar)?;
    let location = require_present(&req.location, "location", MAX_ADDRESS_LEN)?;
    validate_optional_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let username = req.username.trim().to_string();
    ensure_username_free(pool, &username).await?;
    if user::aadhaar_exists(pool, &aadhaar).await? {
        return Err(AppError::new(ErrorCode::AadhaarExists).with_detail("field", "aadhaar_number"));
    }

    let created = user::create(
        pool,
        NewUser {
            name: req.name.trim().to_string(),
            username,
            hash_pass: hash_password(&req.password)?,
            role: Role::Citizen,
            department: None,
            designation: None,
            phone: req.phone,
            permissions: vec![],
            verified: true,
            assigned_to: None,
            aadhaar_number: Some(aadhaar),
            location: Some(location),
        },
    )
    .await?;

    audit_log!(created.id, "user_registered", format!("user:{}", created.id));
    issue(jwt, created)
}

pub async fn login(pool: &SqlitePool, jwt: &JwtService, req: LoginRequest) -> AppResult<AuthResponse> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::validation("username and password are required"));
    }

    let found = user::find_by_username(pool, req.username.trim()).await?;
    let Some(found) = found.filter(|u| verify_password(&req.password, &u.hash_pass)) else {
        security_log!(WARN, "login_failed", username = req.username);
        return Err(AppError::invalid_credentials());
    };

    tracing::info!(user_id = found.id, role = %found.role, "User logged in");
    issue(jwt, found)
}

/// The caller's own record
pub async fn profile(pool: &SqlitePool, caller: &CurrentUser) -> AppResult<User> {
    user::find_by_id(pool, caller.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))
}

/// Update the caller's profile; only [`ProfileUpdate::EDITABLE_FIELDS`] may appear
pub async fn update_profile(
    pool: &SqlitePool,
    caller: &CurrentUser,
    body: Map<String, Value>,
) -> AppResult<User> {
    let rejected = disallowed_fields(&body, ProfileUpdate::EDITABLE_FIELDS);
    if !rejected.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::FieldNotEditable,
            format!("Field(s) cannot be edited: {}", rejected.join(", ")),
        )
        .with_detail("fields", rejected));
    }

    let update: ProfileUpdate = serde_json::from_value(Value::Object(body))
        .map_err(|e| AppError::validation(format!("Invalid profile update: {e}")))?;
    if let Some(name) = &update.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&update.location, "location", MAX_ADDRESS_LEN)?;
    validate_optional_text(&update.designation, "designation", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&update.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&update.avatar, "avatar", MAX_URL_LEN)?;

    user::update_profile(pool, caller.id, &update)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))
}

/// Directory of government officials
pub async fn list_officials(pool: &SqlitePool) -> AppResult<Vec<User>> {
    Ok(user::find_by_role(pool, Role::Government, None).await?)
}

/// Provision a government official (admin only)
pub async fn create_official(
    pool: &SqlitePool,
    admin: &CurrentUser,
    req: OfficialCreate,
) -> AppResult<User> {
    validate_credentials(&req.name, &req.username, &req.password)?;
    let department = require_present(&req.department, "department", MAX_SHORT_TEXT_LEN)?;
    let designation = require_present(&req.designation, "designation", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let permissions = match req.permissions {
        Some(requested) => {
            let unknown = unknown_permissions(&requested);
            if !unknown.is_empty() {
                return Err(AppError::validation(format!(
                    "Unknown permission(s): {}",
                    unknown.join(", ")
                )));
            }
            requested
        }
        None => default_permissions(Role::Government),
    };

    let username = req.username.trim().to_string();
    ensure_username_free(pool, &username).await?;

    let created = user::create(
        pool,
        NewUser {
            name: req.name.trim().to_string(),
            username,
            hash_pass: hash_password(&req.password)?,
            role: Role::Government,
            department: Some(department.clone()),
            designation: Some(designation),
            phone: req.phone,
            permissions,
            verified: true,
            assigned_to: None,
            aadhaar_number: None,
            location: None,
        },
    )
    .await?;

    audit_log!(
        admin.id,
        "official_created",
        format!("user:{}", created.id),
        format!("department={department}")
    );
    Ok(created)
}

/// Create the configured administrator unless the username is already taken
pub async fn ensure_admin(pool: &SqlitePool, admin: &BootstrapAdmin) -> AppResult<()> {
    if user::username_exists(pool, &admin.username).await? {
        return Ok(());
    }
    validate_credentials(&admin.name, &admin.username, &admin.password)?;

    let created = user::create(
        pool,
        NewUser {
            name: admin.name.clone(),
            username: admin.username.clone(),
            hash_pass: hash_password(&admin.password)?,
            role: Role::Admin,
            department: None,
            designation: None,
            phone: None,
            permissions: default_permissions(Role::Admin),
            verified: true,
            assigned_to: None,
            aadhaar_number: None,
            location: None,
        },
    )
    .await?;

    tracing::info!(user_id = created.id, username = %created.username, "Bootstrap administrator created");
    Ok(())
}

pub async fn system_stats(pool: &SqlitePool) -> AppResult<SystemStats> {
    let users = user::count_by_role(pool).await?;
    let (total_posts, resolved_posts) = post::totals(pool).await?;
    let (total_tasks, open_tasks) = task::totals(pool).await?;
    Ok(SystemStats {
        users,
        total_posts,
        resolved_posts,
        total_tasks,
        open_tasks,
    })
}
