//! Authorization matrix
//!
//! One table decides which roles may run which operation. Ownership and
//! department checks happen in the services, after the matrix has let the
//! caller through.
//!
//! | Operation | citizen | government | worker | admin |
//! |-----------|:-------:|:----------:|:------:|:-----:|
//! | post create/list/view/edit/upvote/comment | ✓ | ✓ | ✓ | ✓ |
//! | post status, post stats | | ✓ | | |
//! | task list/view | | ✓ | ✓ | ✓ |
//! | task create, task review | | ✓ | | |
//! | task status | | | ✓ | |
//! | worker list/view/create, official directory | | ✓ | | ✓ |
//! | profile view/update | ✓ | ✓ | ✓ | ✓ |
//! | manage officials, system stats | | | | ✓ |

use shared::error::ErrorCode;
use shared::models::Role;
use sqlx::{Executor, Sqlite};

use crate::auth::CurrentUser;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::{AppError, AppResult};

/// Every operation exposed over the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreatePost,
    ListPosts,
    ViewPost,
    EditPost,
    UpdatePostStatus,
    UpvotePost,
    CommentOnPost,
    ViewPostStats,
    ListTasks,
    ViewTask,
    CreateTask,
    UpdateTaskStatus,
    ReviewTask,
    ListWorkers,
    ViewWorker,
    CreateWorker,
    ListOfficials,
    ViewProfile,
    UpdateProfile,
    ManageOfficials,
    ViewSystemStats,
}

const EVERYONE: &[Role] = &Role::ALL;
const OFFICIALS: &[Role] = &[Role::Government];
const WORKERS: &[Role] = &[Role::Worker];
const ADMINS: &[Role] = &[Role::Admin];
const OFFICIALS_AND_ADMINS: &[Role] = &[Role::Government, Role::Admin];
const TASK_READERS: &[Role] = &[Role::Government, Role::Worker, Role::Admin];

impl Operation {
    pub const ALL: [Operation; 21] = [
        Operation::CreatePost,
        Operation::ListPosts,
        Operation::ViewPost,
        Operation::EditPost,
        Operation::UpdatePostStatus,
        Operation::UpvotePost,
        Operation::CommentOnPost,
        Operation::ViewPostStats,
        Operation::ListTasks,
        Operation::ViewTask,
        Operation::CreateTask,
        Operation::UpdateTaskStatus,
        Operation::ReviewTask,
        Operation::ListWorkers,
        Operation::ViewWorker,
        Operation::CreateWorker,
        Operation::ListOfficials,
        Operation::ViewProfile,
        Operation::UpdateProfile,
        Operation::ManageOfficials,
        Operation::ViewSystemStats,
    ];

    /// Roles allowed to run this operation
    pub const fn allowed_roles(self) -> &'static [Role] {
        match self {
            Operation::CreatePost
            | Operation::ListPosts
            | Operation::ViewPost
            | Operation::EditPost
            | Operation::UpvotePost
            | Operation::CommentOnPost
            | Operation::ViewProfile
            | Operation::UpdateProfile => EVERYONE,

            Operation::UpdatePostStatus
            | Operation::ViewPostStats
            | Operation::CreateTask
            | Operation::ReviewTask => OFFICIALS,

            Operation::UpdateTaskStatus => WORKERS,

            Operation::ListTasks | Operation::ViewTask => TASK_READERS,

            Operation::ListWorkers
            | Operation::ViewWorker
            | Operation::CreateWorker
            | Operation::ListOfficials => OFFICIALS_AND_ADMINS,

            Operation::ManageOfficials | Operation::ViewSystemStats => ADMINS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreatePost => "create_post",
            Operation::ListPosts => "list_posts",
            Operation::ViewPost => "view_post",
            Operation::EditPost => "edit_post",
            Operation::UpdatePostStatus => "update_post_status",
            Operation::UpvotePost => "upvote_post",
            Operation::CommentOnPost => "comment_on_post",
            Operation::ViewPostStats => "view_post_stats",
            Operation::ListTasks => "list_tasks",
            Operation::ViewTask => "view_task",
            Operation::CreateTask => "create_task",
            Operation::UpdateTaskStatus => "update_task_status",
            Operation::ReviewTask => "review_task",
            Operation::ListWorkers => "list_workers",
            Operation::ViewWorker => "view_worker",
            Operation::CreateWorker => "create_worker",
            Operation::ListOfficials => "list_officials",
            Operation::ViewProfile => "view_profile",
            Operation::UpdateProfile => "update_profile",
            Operation::ManageOfficials => "manage_officials",
            Operation::ViewSystemStats => "view_system_stats",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `role` may run `op`
pub fn is_allowed(role: Role, op: Operation) -> bool {
    op.allowed_roles().contains(&role)
}

/// Gate an operation on the caller's role
///
/// Runs before any payload validation, so a disallowed role always gets 403.
pub fn authorize(user: &CurrentUser, op: Operation) -> AppResult<()> {
    if is_allowed(user.role, op) {
        return Ok(());
    }

    security_log!(
        WARN,
        "permission_denied",
        user_id = user.id,
        username = user.username,
        role = user.role,
        operation = op
    );

    let allowed: Vec<&str> = op.allowed_roles().iter().map(Role::as_str).collect();
    Err(AppError::with_message(
        ErrorCode::RoleRequired,
        format!("Access denied: {op} requires role {}", allowed.join(" or ")),
    )
    .with_detail("operation", op.as_str())
    .with_detail("role", user.role.as_str()))
}

/// Caller's department: token claim first, then the stored record
pub async fn known_department<'e, E>(executor: E, user: &CurrentUser) -> AppResult<Option<String>>
where
    E: Executor<'e, Database = Sqlite>,
{
    if let Some(department) = &user.department {
        return Ok(Some(department.clone()));
    }
    tracing::debug!(user_id = user.id, "Department missing from token, reading user record");
    Ok(user::department_of(executor, user.id)
        .await?
        .filter(|d| !d.is_empty()))
}

/// Caller's department, or 400 when neither the token nor the record has one
pub async fn require_department<'e, E>(executor: E, user: &CurrentUser) -> AppResult<String>
where
    E: Executor<'e, Database = Sqlite>,
{
    known_department(executor, user)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::DepartmentMissing))
}
