//! Post workflows

use serde_json::{Map, Value};
use shared::error::ErrorCode;
use shared::models::{
    CommentCreate, DEFAULT_DEPARTMENT, Post, PostComment, PostCreate, PostDetail, PostQuery,
    PostStats, PostStatusUpdate, PostUpdate, Role, UpvoteResult,
};
use sqlx::SqlitePool;

use super::{acquire, begin, commit};
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::db::repository::post::{self, StatusChange};
use crate::db::repository::user;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN,
    disallowed_fields, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

fn post_not_found() -> AppError {
    AppError::new(ErrorCode::PostNotFound)
}

async fn ensure_exists(pool: &SqlitePool, id: i64) -> AppResult<i64> {
    post::author_of(pool, id).await?.ok_or_else(post_not_found)
}

pub async fn create(pool: &SqlitePool, author: &CurrentUser, req: PostCreate) -> AppResult<Post> {
    validate_required_text(&req.title, "title", MAX_NAME_LEN)?;
    validate_required_text(&req.description, "description", MAX_NOTE_LEN)?;
    validate_required_text(&req.location, "location", MAX_ADDRESS_LEN)?;
    let category = req.category.ok_or_else(|| AppError::required("category"))?;
    validate_optional_text(&req.department, "department", MAX_SHORT_TEXT_LEN)?;
    for media in req.images.iter().chain(&req.videos) {
        validate_required_text(&media.url, "url", MAX_URL_LEN)?;
    }

    let department = req
        .department
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_DEPARTMENT)
        .to_string();

    let mut conn = acquire(pool).await?;
    let created = post::create(&mut conn, author.id, category, &department, &req).await?;

    audit_log!(author.id, "post_created", format!("post:{}", created.id));
    Ok(created)
}

pub async fn list(pool: &SqlitePool, query: &PostQuery) -> AppResult<Vec<Post>> {
    Ok(post::find_all(pool, query).await?)
}

/// A post with its upvoters and comments
pub async fn get(pool: &SqlitePool, id: i64) -> AppResult<PostDetail> {
    let post = post::find_by_id(pool, id).await?.ok_or_else(post_not_found)?;
    let upvotes = post::upvoter_ids(pool, id).await?;
    let comments = post::comments_for(pool, id).await?;
    Ok(PostDetail {
        post,
        upvotes,
        comments,
    })
}

/// Fields `caller` may edit on a post written by `author_id`
fn editable_fields(caller: &CurrentUser, author_id: i64) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if caller.id == author_id {
        fields.extend_from_slice(PostUpdate::AUTHOR_FIELDS);
    }
    if matches!(caller.role, Role::Government | Role::Admin) {
        fields.extend_from_slice(PostUpdate::OFFICIAL_FIELDS);
    }
    fields
}

/// Whitelisted general update
///
/// Authors edit the content of their own post; officials and admins edit
/// the triage fields of any post. A body naming anything else is refused
/// as a whole.
pub async fn edit(
    pool: &SqlitePool,
    caller: &CurrentUser,
    id: i64,
    body: Map<String, Value>,
) -> AppResult<Post> {
    let author_id = ensure_exists(pool, id).await?;
    let allowed = editable_fields(caller, author_id);
    if allowed.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::FieldNotEditable,
            "You cannot edit this post",
        ));
    }

    let rejected = disallowed_fields(&body, &allowed);
    if !rejected.is_empty() {
        crate::security_log!(
            WARN,
            "post_field_rejected",
            user_id = caller.id,
            post_id = id,
            fields = rejected.join(",")
        );
        return Err(AppError::with_message(
            ErrorCode::FieldNotEditable,
            format!("Field(s) cannot be edited: {}", rejected.join(", ")),
        )
        .with_detail("fields", rejected));
    }

    let update: PostUpdate = serde_json::from_value(Value::Object(body))
        .map_err(|e| AppError::validation(format!("Invalid post update: {e}")))?;
    if let Some(title) = &update.title {
        validate_required_text(title, "title", MAX_NAME_LEN)?;
    }
    if let Some(description) = &update.description {
        validate_required_text(description, "description", MAX_NOTE_LEN)?;
    }
    if let Some(location) = &update.location {
        validate_required_text(location, "location", MAX_ADDRESS_LEN)?;
    }
    if let Some(department) = &update.department {
        validate_required_text(department, "department", MAX_SHORT_TEXT_LEN)?;
    }

    let mut conn = acquire(pool).await?;
    let updated = post::update_fields(&mut conn, id, &update).await?;
    Ok(updated)
}

/// Official status change
pub async fn update_status(
    pool: &SqlitePool,
    official: &CurrentUser,
    id: i64,
    req: PostStatusUpdate,
) -> AppResult<Post> {
    let status = req.status.ok_or_else(|| AppError::required("status"))?;
    validate_optional_text(&req.resolution_notes, "resolution_notes", MAX_NOTE_LEN)?;
    ensure_exists(pool, id).await?;

    if let Some(worker_id) = req.assigned_to {
        let is_worker = user::find_by_id(pool, worker_id)
            .await?
            .is_some_and(|u| u.role == Role::Worker);
        if !is_worker {
            return Err(AppError::new(ErrorCode::InvalidWorker).with_detail("assigned_to", worker_id));
        }
    }

    post::update_status(
        pool,
        id,
        StatusChange {
            status,
            resolution_notes: req.resolution_notes.as_deref(),
            resolution_images: req.resolution_images.as_deref(),
            assigned_to: req.assigned_to,
        },
    )
    .await?;

    audit_log!(
        official.id,
        "post_status_changed",
        format!("post:{id}"),
        format!("status={status:?}")
    );
    post::find_by_id(pool, id).await?.ok_or_else(post_not_found)
}

/// Toggle the caller's upvote and refresh the engagement score
pub async fn toggle_upvote(pool: &SqlitePool, caller: &CurrentUser, id: i64) -> AppResult<UpvoteResult> {
    let mut tx = begin(pool).await?;
    if post::author_of(&mut *tx, id).await?.is_none() {
        return Err(post_not_found());
    }
    let upvoted = post::toggle_upvote(&mut tx, id, caller.id).await?;
    let (upvote_count, engagement_score) = post::refresh_engagement(&mut tx, id).await?;
    commit(tx).await?;

    Ok(UpvoteResult {
        upvoted,
        upvote_count,
        engagement_score,
    })
}

pub async fn add_comment(
    pool: &SqlitePool,
    caller: &CurrentUser,
    id: i64,
    req: CommentCreate,
) -> AppResult<PostComment> {
    validate_required_text(&req.text, "text", MAX_NOTE_LEN)?;

    let mut tx = begin(pool).await?;
    if post::author_of(&mut *tx, id).await?.is_none() {
        return Err(post_not_found());
    }
    let comment = post::add_comment(&mut tx, id, caller.id, req.text.trim()).await?;
    post::refresh_engagement(&mut tx, id).await?;
    commit(tx).await?;
    Ok(comment)
}

pub async fn stats(pool: &SqlitePool) -> AppResult<PostStats> {
    let mut conn = acquire(pool).await?;
    Ok(post::stats(&mut conn).await?)
}
