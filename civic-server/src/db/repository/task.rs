//! Task Repository

use super::{RepoError, RepoResult};
use shared::models::{DigitalSignature, Priority, Task, TaskQuery, TaskReport, TaskStatus, WorkProof};
use shared::util::{now_millis, snowflake_id};
use sqlx::types::Json;
use sqlx::{Executor, Sqlite, SqliteConnection};

const TASK_SELECT: &str = "SELECT t.id, t.post_id, p.title AS post_title, t.assigned_to, t.assigned_by, t.department, t.status, t.priority, t.description, t.instructions, t.work_proof, t.worker_remarks, t.official_remarks, t.completion_date, t.digital_signature, t.report, t.review_date, t.created_at, t.updated_at FROM tasks t LEFT JOIN posts p ON p.id = t.post_id";

/// Which tasks a listing may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    /// Tasks assigned to this worker
    AssignedTo(i64),
    /// Tasks created by this official
    AssignedBy(i64),
    All,
}

/// Validated task insert
#[derive(Debug, Clone)]
pub struct NewTask {
    pub post_id: i64,
    pub assigned_to: i64,
    pub assigned_by: i64,
    pub department: Option<String>,
    pub priority: Priority,
    pub description: Option<String>,
    pub instructions: Option<String>,
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Task>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{TASK_SELECT} WHERE t.id = ?");
    let row = sqlx::query_as::<_, Task>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

async fn fetch(conn: &mut SqliteConnection, id: i64) -> RepoResult<Task> {
    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Task {id}")))
}

/// Tasks visible under `scope`, filtered and newest first
pub async fn find_all<'e, E>(executor: E, scope: TaskScope, query: &TaskQuery) -> RepoResult<Vec<Task>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let (assigned_to, assigned_by) = match scope {
        TaskScope::AssignedTo(id) => (Some(id), None),
        TaskScope::AssignedBy(id) => (None, Some(id)),
        TaskScope::All => (None, None),
    };
    let sql = format!(
        "{TASK_SELECT} WHERE (?1 IS NULL OR t.assigned_to = ?1) AND (?2 IS NULL OR t.assigned_by = ?2) AND (?3 IS NULL OR t.status = ?3) AND (?4 IS NULL OR t.department = ?4) \
         ORDER BY t.created_at DESC, t.id DESC"
    );
    let rows = sqlx::query_as::<_, Task>(&sql)
        .bind(assigned_to)
        .bind(assigned_by)
        .bind(query.status)
        .bind(query.department.as_deref())
        .fetch_all(executor)
        .await?;
    Ok(rows)
}

pub async fn create(conn: &mut SqliteConnection, data: NewTask) -> RepoResult<Task> {
    let now = now_millis();
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO tasks (id, post_id, assigned_to, assigned_by, department, status, priority, description, instructions, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
    )
    .bind(id)
    .bind(data.post_id)
    .bind(data.assigned_to)
    .bind(data.assigned_by)
    .bind(&data.department)
    .bind(TaskStatus::Assigned)
    .bind(data.priority)
    .bind(&data.description)
    .bind(&data.instructions)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    fetch(conn, id).await
}

/// Fields a worker may write
#[derive(Debug, Clone, Default)]
pub struct WorkerChange {
    pub status: Option<TaskStatus>,
    pub worker_remarks: Option<String>,
    pub work_proof: Option<Vec<WorkProof>>,
}

/// Apply a worker update; moving to completed stamps `completion_date`
pub async fn apply_worker_change(
    conn: &mut SqliteConnection,
    id: i64,
    change: WorkerChange,
) -> RepoResult<Task> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE tasks SET status = COALESCE(?1, status), worker_remarks = COALESCE(?2, worker_remarks), work_proof = COALESCE(?3, work_proof), \
         completion_date = CASE WHEN ?1 = 'completed' THEN ?4 ELSE completion_date END, \
         updated_at = ?4 WHERE id = ?5",
    )
    .bind(change.status)
    .bind(&change.worker_remarks)
    .bind(change.work_proof.as_ref().map(Json))
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Task {id}")));
    }
    fetch(conn, id).await
}

/// Fields an official may write while reviewing
#[derive(Debug, Clone, Default)]
pub struct ReviewChange {
    pub status: Option<TaskStatus>,
    pub official_remarks: Option<String>,
    pub digital_signature: Option<DigitalSignature>,
    pub report: Option<TaskReport>,
}

/// Apply a review; attaching a report stamps `review_date`
pub async fn apply_review(
    conn: &mut SqliteConnection,
    id: i64,
    change: ReviewChange,
) -> RepoResult<Task> {
    let now = now_millis();
    let has_report = change.report.is_some();
    let rows = sqlx::query(
        "UPDATE tasks SET status = COALESCE(?1, status), official_remarks = COALESCE(?2, official_remarks), \
         digital_signature = COALESCE(?3, digital_signature), report = COALESCE(?4, report), \
         review_date = CASE WHEN ?5 THEN ?6 ELSE review_date END, \
         updated_at = ?6 WHERE id = ?7",
    )
    .bind(change.status)
    .bind(&change.official_remarks)
    .bind(change.digital_signature.as_ref().map(Json))
    .bind(change.report.as_ref().map(Json))
    .bind(has_report)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Task {id}")));
    }
    fetch(conn, id).await
}

/// `(total, open)` task counts; open means not yet closed
pub async fn totals<'e, E>(executor: E) -> RepoResult<(i64, i64)>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row: (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(status <> 'closed'), 0) FROM tasks")
            .fetch_one(executor)
            .await?;
    Ok(row)
}
