//! Task workflows
//!
//! A task binds a post to a worker. Creating one assigns the post, closing
//! one resolves it; both cascades commit with the task write.

use shared::error::ErrorCode;
use shared::models::{
    DigitalSignature, Role, Task, TaskCreate, TaskQuery, TaskReport, TaskReview, TaskStatus,
    TaskStatusUpdate, WorkProof,
};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{acquire, begin, commit};
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::auth::policy::known_department;
use crate::db::repository::task::{self, NewTask, ReviewChange, TaskScope, WorkerChange};
use crate::db::repository::{post, user};
use crate::security_log;
use crate::utils::validation::{MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult};

fn task_not_found() -> AppError {
    AppError::new(ErrorCode::TaskNotFound)
}

fn not_owner(caller: &CurrentUser, task_id: i64, action: &str) -> AppError {
    security_log!(
        WARN,
        "task_ownership_denied",
        user_id = caller.id,
        task_id = task_id,
        action = action
    );
    AppError::new(ErrorCode::NotTaskOwner)
}

/// Create a task for a post and hand the post to the worker
pub async fn create(pool: &SqlitePool, official: &CurrentUser, req: TaskCreate) -> AppResult<Task> {
    let post_id = req.post_id.ok_or_else(|| AppError::required("post_id"))?;
    let worker_id = req.assigned_to.ok_or_else(|| AppError::required("assigned_to"))?;
    validate_optional_text(&req.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&req.instructions, "instructions", MAX_NOTE_LEN)?;

    if post::author_of(pool, post_id).await?.is_none() {
        return Err(AppError::new(ErrorCode::PostNotFound));
    }

    let worker = user::find_by_id(pool, worker_id)
        .await?
        .filter(|u| u.role == Role::Worker)
        .ok_or_else(|| AppError::new(ErrorCode::InvalidWorker).with_detail("assigned_to", worker_id))?;

    // Unknown official department skips the comparison
    let department = match known_department(pool, official).await? {
        Some(own) => {
            if worker.department.as_deref() != Some(own.as_str()) {
                return Err(AppError::new(ErrorCode::WorkerDepartmentMismatch)
                    .with_detail("official_department", own)
                    .with_detail("worker_department", worker.department.unwrap_or_default()));
            }
            Some(own)
        }
        None => worker.department.clone(),
    };

    let mut tx = begin(pool).await?;
    let created = task::create(
        &mut tx,
        NewTask {
            post_id,
            assigned_to: worker.id,
            assigned_by: official.id,
            department,
            priority: req.priority.unwrap_or_default(),
            description: req.description,
            instructions: req.instructions,
        },
    )
    .await?;
    post::mark_assigned(&mut *tx, post_id, worker.id).await?;
    commit(tx).await?;

    audit_log!(
        official.id,
        "task_created",
        format!("task:{}", created.id),
        format!("post={post_id} worker={}", worker.id)
    );
    Ok(created)
}

/// Tasks visible to the caller
pub async fn list(pool: &SqlitePool, caller: &CurrentUser, query: &TaskQuery) -> AppResult<Vec<Task>> {
    let scope = match caller.role {
        Role::Worker => TaskScope::AssignedTo(caller.id),
        Role::Government => TaskScope::AssignedBy(caller.id),
        Role::Admin => TaskScope::All,
        Role::Citizen => return Err(AppError::forbidden("Citizens cannot list tasks")),
    };
    Ok(task::find_all(pool, scope, query).await?)
}

/// One task, visible to its assignee, its assigner, or an admin
pub async fn get(pool: &SqlitePool, caller: &CurrentUser, id: i64) -> AppResult<Task> {
    let found = task::find_by_id(pool, id).await?.ok_or_else(task_not_found)?;
    if caller.is_admin() || found.assigned_to == caller.id || found.assigned_by == caller.id {
        Ok(found)
    } else {
        Err(not_owner(caller, id, "view"))
    }
}

/// Worker progress report
pub async fn update_status(
    pool: &SqlitePool,
    worker: &CurrentUser,
    id: i64,
    req: TaskStatusUpdate,
) -> AppResult<Task> {
    let found = task::find_by_id(pool, id).await?.ok_or_else(task_not_found)?;
    if found.assigned_to != worker.id {
        return Err(not_owner(worker, id, "update_status"));
    }
    validate_optional_text(&req.worker_remarks, "worker_remarks", MAX_NOTE_LEN)?;

    let now = now_millis();
    let work_proof = match req.work_proof {
        Some(entries) => {
            let mut proofs = Vec::with_capacity(entries.len());
            for entry in entries {
                validate_required_text(&entry.url, "url", MAX_URL_LEN)?;
                proofs.push(WorkProof {
                    url: entry.url,
                    description: entry.description,
                    uploaded_at: entry.uploaded_at.unwrap_or(now),
                });
            }
            Some(proofs)
        }
        None => None,
    };

    let mut conn = acquire(pool).await?;
    let updated = task::apply_worker_change(
        &mut conn,
        id,
        WorkerChange {
            status: req.status,
            worker_remarks: req.worker_remarks,
            work_proof,
        },
    )
    .await?;

    if req.status == Some(TaskStatus::Completed) {
        audit_log!(worker.id, "task_completed", format!("task:{id}"));
    }
    Ok(updated)
}

/// Official review; closing the task resolves its post
pub async fn review(
    pool: &SqlitePool,
    official: &CurrentUser,
    id: i64,
    req: TaskReview,
) -> AppResult<Task> {
    let found = task::find_by_id(pool, id).await?.ok_or_else(task_not_found)?;
    if found.assigned_by != official.id {
        return Err(not_owner(official, id, "review"));
    }
    validate_optional_text(&req.official_remarks, "official_remarks", MAX_NOTE_LEN)?;
    validate_optional_text(&req.report, "report", MAX_NOTE_LEN)?;

    let now = now_millis();
    let change = ReviewChange {
        status: req.status,
        official_remarks: req.official_remarks,
        digital_signature: req.digital_signature.map(|payload| DigitalSignature {
            payload,
            signed_by: official.id,
            signed_at: now,
        }),
        report: req.report.map(|content| TaskReport {
            content,
            generated_at: now,
        }),
    };

    let mut tx = begin(pool).await?;
    let updated = task::apply_review(&mut tx, id, change).await?;
    if updated.status == TaskStatus::Closed {
        post::mark_resolved(&mut *tx, updated.post_id).await?;
    }
    commit(tx).await?;

    audit_log!(
        official.id,
        "task_reviewed",
        format!("task:{id}"),
        format!("status={:?}", updated.status)
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::{NewUser, PostCategory, PostCreate, PostStatus, WorkProofInput};

    async fn seed(db: &DbService, username: &str, role: Role, department: Option<&str>) -> CurrentUser {
        let stored = user::create(
            &db.pool,
            NewUser {
                name: username.into(),
                username: username.into(),
                hash_pass: "h".into(),
                role,
                department: department.map(String::from),
                designation: None,
                phone: None,
                permissions: vec![],
                verified: true,
                assigned_to: None,
                aadhaar_number: None,
                location: None,
            },
        )
        .await
        .unwrap();
        CurrentUser {
            id: stored.id,
            username: stored.username,
            role,
            department: stored.department,
            designation: None,
        }
    }

    async fn seed_post(db: &DbService, author: &CurrentUser) -> i64 {
        let mut conn = db.pool.acquire().await.unwrap();
        post::create(
            &mut conn,
            author.id,
            PostCategory::Infrastructure,
            "roads",
            &PostCreate {
                title: "Broken streetlight".into(),
                description: "Dark at night".into(),
                location: "Lane 3".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .id
    }

    struct World {
        db: DbService,
        citizen: CurrentUser,
        official: CurrentUser,
        worker: CurrentUser,
        post_id: i64,
    }

    async fn world() -> World {
        let db = DbService::in_memory().await.unwrap();
        let citizen = seed(&db, "asha", Role::Citizen, None).await;
        let official = seed(&db, "ravi", Role::Government, Some("roads")).await;
        let worker = seed(&db, "wasim", Role::Worker, Some("roads")).await;
        let post_id = seed_post(&db, &citizen).await;
        World {
            db,
            citizen,
            official,
            worker,
            post_id,
        }
    }

    fn assign(w: &World) -> TaskCreate {
        TaskCreate {
            post_id: Some(w.post_id),
            assigned_to: Some(w.worker.id),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_post() {
        let w = world().await;
        let created = create(&w.db.pool, &w.official, assign(&w)).await.unwrap();
        assert_eq!(created.status, TaskStatus::Assigned);
        assert_eq!(created.department.as_deref(), Some("roads"));

        let p = post::find_by_id(&w.db.pool, w.post_id).await.unwrap().unwrap();
        assert_eq!(p.status, PostStatus::Assigned);
        assert_eq!(p.assigned_to, Some(w.worker.id));
    }

    #[tokio::test]
    async fn test_create_validations() {
        let w = world().await;
        let err = create(&w.db.pool, &w.official, TaskCreate::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);

        let mut missing_post = assign(&w);
        missing_post.post_id = Some(1);
        let err = create(&w.db.pool, &w.official, missing_post).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PostNotFound);

        let mut not_worker = assign(&w);
        not_worker.assigned_to = Some(w.citizen.id);
        let err = create(&w.db.pool, &w.official, not_worker).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidWorker);
    }

    #[tokio::test]
    async fn test_cross_department_worker_rejected() {
        let w = world().await;
        let water = seed(&w.db, "meena", Role::Government, Some("water")).await;
        let err = create(&w.db.pool, &water, assign(&w)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::WorkerDepartmentMismatch);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);

        let p = post::find_by_id(&w.db.pool, w.post_id).await.unwrap().unwrap();
        assert_eq!(p.status, PostStatus::Pending);
    }

    #[tokio::test]
    async fn test_unknown_official_department_uses_worker_department() {
        let w = world().await;
        let floating = seed(&w.db, "kiran", Role::Government, None).await;
        let created = create(&w.db.pool, &floating, assign(&w)).await.unwrap();
        assert_eq!(created.department.as_deref(), Some("roads"));
    }

    #[tokio::test]
    async fn test_only_assignee_updates_status() {
        let w = world().await;
        let t = create(&w.db.pool, &w.official, assign(&w)).await.unwrap();
        let other = seed(&w.db, "omar", Role::Worker, Some("roads")).await;

        let err = update_status(
            &w.db.pool,
            &other,
            t.id,
            TaskStatusUpdate {
                status: Some(TaskStatus::InProgress),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotTaskOwner);
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);

        let done = update_status(
            &w.db.pool,
            &w.worker,
            t.id,
            TaskStatusUpdate {
                status: Some(TaskStatus::Completed),
                worker_remarks: Some("Replaced bulb".into()),
                work_proof: Some(vec![WorkProofInput {
                    url: "https://cdn.example/after.jpg".into(),
                    description: None,
                    uploaded_at: None,
                }]),
            },
        )
        .await
        .unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(done.completion_date.is_some());
        assert_eq!(done.work_proof.len(), 1);
        assert!(done.work_proof[0].uploaded_at > 0);
    }

    #[tokio::test]
    async fn test_closing_resolves_post() {
        let w = world().await;
        let t = create(&w.db.pool, &w.official, assign(&w)).await.unwrap();

        let err = review(&w.db.pool, &w.worker, t.id, TaskReview::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotTaskOwner);

        let closed = review(
            &w.db.pool,
            &w.official,
            t.id,
            TaskReview {
                status: Some(TaskStatus::Closed),
                official_remarks: Some("Verified on site".into()),
                digital_signature: Some("sig".into()),
                report: Some("Light restored".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(closed.status, TaskStatus::Closed);
        assert!(closed.review_date.is_some());
        let signature = closed.digital_signature.unwrap();
        assert_eq!(signature.signed_by, w.official.id);

        let p = post::find_by_id(&w.db.pool, w.post_id).await.unwrap().unwrap();
        assert_eq!(p.status, PostStatus::Resolved);
        assert!(p.resolved_at.is_some());
    }

    #[tokio::test]
    async fn test_visibility() {
        let w = world().await;
        let t = create(&w.db.pool, &w.official, assign(&w)).await.unwrap();
        let stranger = seed(&w.db, "omar", Role::Worker, Some("roads")).await;

        assert!(get(&w.db.pool, &w.worker, t.id).await.is_ok());
        assert!(get(&w.db.pool, &w.official, t.id).await.is_ok());
        let err = get(&w.db.pool, &stranger, t.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotTaskOwner);

        let mine = list(&w.db.pool, &w.worker, &TaskQuery::default()).await.unwrap();
        assert_eq!(mine.len(), 1);
        let theirs = list(&w.db.pool, &stranger, &TaskQuery::default()).await.unwrap();
        assert!(theirs.is_empty());
    }
}
