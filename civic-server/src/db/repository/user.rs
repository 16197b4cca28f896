//! User Repository

use super::RepoResult;
use shared::models::{NewUser, ProfileUpdate, Role, RoleCounts, User};
use sqlx::types::Json;
use sqlx::{Executor, Sqlite};

const USER_COLUMNS: &str = "id, name, username, hash_pass, role, department, designation, phone, permissions, verified, assigned_to, aadhaar_number, location, avatar, created_at, updated_at";

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

pub async fn find_by_username<'e, E>(executor: E, username: &str) -> RepoResult<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

pub async fn username_exists<'e, E>(executor: E, username: &str) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
            .bind(username)
            .fetch_one(executor)
            .await?;
    Ok(exists)
}

pub async fn aadhaar_exists<'e, E>(executor: E, aadhaar_number: &str) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE aadhaar_number = ?)")
            .bind(aadhaar_number)
            .fetch_one(executor)
            .await?;
    Ok(exists)
}

/// Department on record for a user (None when the user or the department is missing)
pub async fn department_of<'e, E>(executor: E, id: i64) -> RepoResult<Option<String>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row: Option<(Option<String>,)> = sqlx::query_as("SELECT department FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.and_then(|(d,)| d))
}

pub async fn create<'e, E>(executor: E, data: NewUser) -> RepoResult<User>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let sql = format!(
        "INSERT INTO users (id, name, username, hash_pass, role, department, designation, phone, permissions, verified, assigned_to, aadhaar_number, location, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?14) RETURNING {USER_COLUMNS}"
    );
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .bind(&data.name)
        .bind(&data.username)
        .bind(&data.hash_pass)
        .bind(data.role)
        .bind(&data.department)
        .bind(&data.designation)
        .bind(&data.phone)
        .bind(Json(&data.permissions))
        .bind(data.verified)
        .bind(data.assigned_to)
        .bind(&data.aadhaar_number)
        .bind(&data.location)
        .bind(now)
        .fetch_one(executor)
        .await?;
    Ok(user)
}

/// Users of one role, optionally limited to a department, sorted by name
pub async fn find_by_role<'e, E>(
    executor: E,
    role: Role,
    department: Option<&str>,
) -> RepoResult<Vec<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {USER_COLUMNS} FROM users WHERE role = ?1 AND (?2 IS NULL OR department = ?2) ORDER BY name COLLATE NOCASE, id"
    );
    let rows = sqlx::query_as::<_, User>(&sql)
        .bind(role)
        .bind(department)
        .fetch_all(executor)
        .await?;
    Ok(rows)
}

/// Apply a profile update; unset fields keep their value
pub async fn update_profile<'e, E>(
    executor: E,
    id: i64,
    data: &ProfileUpdate,
) -> RepoResult<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let sql = format!(
        "UPDATE users SET name = COALESCE(?1, name), location = COALESCE(?2, location), designation = COALESCE(?3, designation), phone = COALESCE(?4, phone), avatar = COALESCE(?5, avatar), updated_at = ?6 \
         WHERE id = ?7 RETURNING {USER_COLUMNS}"
    );
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(&data.name)
        .bind(&data.location)
        .bind(&data.designation)
        .bind(&data.phone)
        .bind(&data.avatar)
        .bind(now)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

pub async fn count_by_role<'e, E>(executor: E) -> RepoResult<RoleCounts>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows: Vec<(Role, i64)> = sqlx::query_as("SELECT role, COUNT(*) FROM users GROUP BY role")
        .fetch_all(executor)
        .await?;

    let mut counts = RoleCounts::default();
    for (role, count) in rows {
        match role {
            Role::Citizen => counts.citizen = count,
            Role::Government => counts.government = count,
            Role::Worker => counts.worker = count,
            Role::Admin => counts.admin = count,
        }
    }
    Ok(counts)
}
