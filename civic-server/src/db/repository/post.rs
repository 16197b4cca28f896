//! Post Repository
//!
//! Upvotes and comments live in their own tables; the select below folds
//! their counts and the author name back into [`Post`].

use super::{RepoError, RepoResult};
use shared::models::{
    CountEntry, Post, PostCategory, PostComment, PostCreate, PostQuery,
    PostStats, PostStatus, PostUpdate, engagement_score,
};
use shared::util::{now_millis, snowflake_id, whole_days_between};
use sqlx::types::Json;
use sqlx::{Executor, Sqlite, SqliteConnection};

const POST_SELECT: &str = "SELECT p.id, p.title, p.description, p.category, p.priority, p.status, p.location, p.coordinates, p.images, p.videos, p.author_id, u.name AS author_name, p.assigned_to, p.department, p.estimated_cost, p.actual_cost, p.resolution_notes, p.resolution_images, \
    (SELECT COUNT(*) FROM post_upvotes v WHERE v.post_id = p.id) AS upvote_count, \
    (SELECT COUNT(*) FROM post_comments c WHERE c.post_id = p.id) AS comment_count, \
    p.engagement_score, p.deadline, p.resolved_at, p.created_at, p.updated_at \
    FROM posts p LEFT JOIN users u ON u.id = p.author_id";

const COMMENT_SELECT: &str = "SELECT c.id, c.post_id, c.author_id, u.name AS author_name, c.text, c.created_at FROM post_comments c LEFT JOIN users u ON u.id = c.author_id";

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Post>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{POST_SELECT} WHERE p.id = ?");
    let row = sqlx::query_as::<_, Post>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

async fn fetch(conn: &mut SqliteConnection, id: i64) -> RepoResult<Post> {
    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Post {id}")))
}

/// All posts matching the filters, newest first
pub async fn find_all<'e, E>(executor: E, query: &PostQuery) -> RepoResult<Vec<Post>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "{POST_SELECT} WHERE (?1 IS NULL OR p.status = ?1) AND (?2 IS NULL OR p.category = ?2) AND (?3 IS NULL OR p.priority = ?3) AND (?4 IS NULL OR p.department = ?4) \
         ORDER BY p.created_at DESC, p.id DESC"
    );
    let rows = sqlx::query_as::<_, Post>(&sql)
        .bind(query.status)
        .bind(query.category)
        .bind(query.priority)
        .bind(query.department.as_deref())
        .fetch_all(executor)
        .await?;
    Ok(rows)
}

pub async fn author_of<'e, E>(executor: E, id: i64) -> RepoResult<Option<i64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row: Option<(i64,)> = sqlx::query_as("SELECT author_id FROM posts WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(|(a,)| a))
}

/// Insert a validated post; status starts pending with no engagement
pub async fn create(
    conn: &mut SqliteConnection,
    author_id: i64,
    category: PostCategory,
    department: &str,
    data: &PostCreate,
) -> RepoResult<Post> {
    let now = now_millis();
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO posts (id, title, description, category, priority, status, location, coordinates, images, videos, author_id, department, engagement_score, deadline, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, 0, ?13, ?14, ?14)",
    )
    .bind(id)
    .bind(data.title.trim())
    .bind(data.description.trim())
    .bind(category)
    .bind(data.priority.unwrap_or_default())
    .bind(PostStatus::Pending)
    .bind(data.location.trim())
    .bind(Json(&data.coordinates))
    .bind(Json(&data.images))
    .bind(Json(&data.videos))
    .bind(author_id)
    .bind(department)
    .bind(data.deadline)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    fetch(conn, id).await
}

/// Apply whitelisted field edits; unset fields keep their value
pub async fn update_fields(
    conn: &mut SqliteConnection,
    id: i64,
    data: &PostUpdate,
) -> RepoResult<Post> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE posts SET title = COALESCE(?1, title), description = COALESCE(?2, description), category = COALESCE(?3, category), location = COALESCE(?4, location), \
         coordinates = COALESCE(?5, coordinates), images = COALESCE(?6, images), videos = COALESCE(?7, videos), priority = COALESCE(?8, priority), \
         department = COALESCE(?9, department), estimated_cost = COALESCE(?10, estimated_cost), actual_cost = COALESCE(?11, actual_cost), deadline = COALESCE(?12, deadline), \
         updated_at = ?13 WHERE id = ?14",
    )
    .bind(data.title.as_deref().map(str::trim))
    .bind(data.description.as_deref().map(str::trim))
    .bind(data.category)
    .bind(data.location.as_deref().map(str::trim))
    .bind(data.coordinates.map(Json))
    .bind(data.images.as_ref().map(Json))
    .bind(data.videos.as_ref().map(Json))
    .bind(data.priority)
    .bind(data.department.as_deref())
    .bind(data.estimated_cost)
    .bind(data.actual_cost)
    .bind(data.deadline)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Post {id}")));
    }
    fetch(conn, id).await
}

/// Fields written by an official status change
#[derive(Debug, Clone, Default)]
pub struct StatusChange<'a> {
    pub status: PostStatus,
    pub resolution_notes: Option<&'a str>,
    pub resolution_images: Option<&'a [String]>,
    pub assigned_to: Option<i64>,
}

/// Set the status; the first move to resolved stamps `resolved_at`
pub async fn update_status<'e, E>(executor: E, id: i64, change: StatusChange<'_>) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE posts SET status = ?1, resolution_notes = COALESCE(?2, resolution_notes), resolution_images = COALESCE(?3, resolution_images), \
         assigned_to = COALESCE(?4, assigned_to), \
         resolved_at = CASE WHEN ?1 = 'resolved' THEN COALESCE(resolved_at, ?5) ELSE resolved_at END, \
         updated_at = ?5 WHERE id = ?6",
    )
    .bind(change.status)
    .bind(change.resolution_notes)
    .bind(change.resolution_images.map(Json))
    .bind(change.assigned_to)
    .bind(now)
    .bind(id)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Hand the post to a worker
pub async fn mark_assigned<'e, E>(executor: E, id: i64, worker_id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    update_status(
        executor,
        id,
        StatusChange {
            status: PostStatus::Assigned,
            assigned_to: Some(worker_id),
            ..Default::default()
        },
    )
    .await
}

pub async fn mark_resolved<'e, E>(executor: E, id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    update_status(
        executor,
        id,
        StatusChange {
            status: PostStatus::Resolved,
            ..Default::default()
        },
    )
    .await
}

/// Add or remove the user's upvote; returns whether the user now upvotes
pub async fn toggle_upvote(
    conn: &mut SqliteConnection,
    post_id: i64,
    user_id: i64,
) -> RepoResult<bool> {
    let removed = sqlx::query("DELETE FROM post_upvotes WHERE post_id = ? AND user_id = ?")
        .bind(post_id)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    if removed.rows_affected() > 0 {
        return Ok(false);
    }

    sqlx::query("INSERT INTO post_upvotes (post_id, user_id, created_at) VALUES (?, ?, ?)")
        .bind(post_id)
        .bind(user_id)
        .bind(now_millis())
        .execute(&mut *conn)
        .await?;
    Ok(true)
}

/// Ids of the users upvoting a post, in upvote order
pub async fn upvoter_ids<'e, E>(executor: E, post_id: i64) -> RepoResult<Vec<i64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows: Vec<(i64,)> =
        sqlx::query_as("SELECT user_id FROM post_upvotes WHERE post_id = ? ORDER BY created_at, user_id")
            .bind(post_id)
            .fetch_all(executor)
            .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Recompute and store the engagement score from the current counts
///
/// Returns `(upvote_count, engagement_score)`.
pub async fn refresh_engagement(conn: &mut SqliteConnection, post_id: i64) -> RepoResult<(i64, f64)> {
    let (upvotes, comments, created_at): (i64, i64, i64) = sqlx::query_as(
        "SELECT (SELECT COUNT(*) FROM post_upvotes WHERE post_id = p.id), (SELECT COUNT(*) FROM post_comments WHERE post_id = p.id), p.created_at FROM posts p WHERE p.id = ?",
    )
    .bind(post_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Post {post_id}")))?;

    let now = now_millis();
    let score = engagement_score(upvotes, comments, whole_days_between(created_at, now));
    sqlx::query("UPDATE posts SET engagement_score = ?, updated_at = ? WHERE id = ?")
        .bind(score)
        .bind(now)
        .bind(post_id)
        .execute(&mut *conn)
        .await?;
    Ok((upvotes, score))
}

pub async fn add_comment(
    conn: &mut SqliteConnection,
    post_id: i64,
    author_id: i64,
    text: &str,
) -> RepoResult<PostComment> {
    let id = snowflake_id();
    sqlx::query("INSERT INTO post_comments (id, post_id, author_id, text, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(id)
        .bind(post_id)
        .bind(author_id)
        .bind(text)
        .bind(now_millis())
        .execute(&mut *conn)
        .await?;

    let sql = format!("{COMMENT_SELECT} WHERE c.id = ?");
    let comment = sqlx::query_as::<_, PostComment>(&sql)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(comment)
}

/// Comment thread of a post, oldest first
pub async fn comments_for<'e, E>(executor: E, post_id: i64) -> RepoResult<Vec<PostComment>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{COMMENT_SELECT} WHERE c.post_id = ? ORDER BY c.created_at, c.id");
    let rows = sqlx::query_as::<_, PostComment>(&sql)
        .bind(post_id)
        .fetch_all(executor)
        .await?;
    Ok(rows)
}

pub async fn stats(conn: &mut SqliteConnection) -> RepoResult<PostStats> {
    let (total, pending, in_progress, resolved, critical): (i64, i64, i64, i64, i64) =
        sqlx::query_as(
            "SELECT COUNT(*), \
             COALESCE(SUM(status = 'pending'), 0), \
             COALESCE(SUM(status = 'in-progress'), 0), \
             COALESCE(SUM(status = 'resolved'), 0), \
             COALESCE(SUM(priority = 'critical'), 0) \
             FROM posts",
        )
        .fetch_one(&mut *conn)
        .await?;

    let by_category = sqlx::query_as::<_, CountEntry>(
        "SELECT category AS key, COUNT(*) AS count FROM posts GROUP BY category ORDER BY count DESC, key",
    )
    .fetch_all(&mut *conn)
    .await?;

    let by_priority = sqlx::query_as::<_, CountEntry>(
        "SELECT priority AS key, COUNT(*) AS count FROM posts GROUP BY priority ORDER BY count DESC, key",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(PostStats {
        total,
        pending,
        in_progress,
        resolved,
        critical,
        by_category,
        by_priority,
    })
}

/// `(total, resolved)` post counts
pub async fn totals<'e, E>(executor: E) -> RepoResult<(i64, i64)>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row: (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(status = 'resolved'), 0) FROM posts")
            .fetch_one(executor)
            .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::user;
    use shared::models::{Coordinates, MediaAttachment, NewUser, Priority, Role};

    fn attachment(url: &str) -> MediaAttachment {
        MediaAttachment {
            url: url.to_string(),
            base64_data: None,
        }
    }

    async fn seed_author(db: &DbService) -> i64 {
        user::create(
            &db.pool,
            NewUser {
                name: "Asha".into(),
                username: "asha".into(),
                hash_pass: "hash".into(),
                role: Role::Citizen,
                department: None,
                designation: None,
                phone: None,
                permissions: vec![],
                verified: true,
                assigned_to: None,
                aadhaar_number: Some("123412341234".into()),
                location: Some("Ward 4".into()),
            },
        )
        .await
        .unwrap()
        .id
    }

    fn payload(title: &str) -> PostCreate {
        PostCreate {
            title: title.into(),
            description: "Deep pothole near the bus stop".into(),
            location: "MG Road".into(),
            coordinates: Some(Coordinates { lat: 12.97, lng: 77.59 }),
            images: vec![attachment("https://cdn.example/p.jpg")],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_sets_defaults() {
        let db = DbService::in_memory().await.unwrap();
        let author = seed_author(&db).await;
        let mut conn = db.pool.acquire().await.unwrap();

        let post = create(&mut conn, author, PostCategory::Infrastructure, "general", &payload("Pothole"))
            .await
            .unwrap();
        assert_eq!(post.status, PostStatus::Pending);
        assert_eq!(post.priority, Priority::Medium);
        assert_eq!(post.author_name.as_deref(), Some("Asha"));
        assert_eq!(post.engagement_score, 0.0);
        assert_eq!(post.coordinates.unwrap().lat, 12.97);
        assert_eq!(post.images.len(), 1);
        assert!(post.resolved_at.is_none());
    }

    #[tokio::test]
    async fn test_resolved_at_is_stamped_once() {
        let db = DbService::in_memory().await.unwrap();
        let author = seed_author(&db).await;
        let mut conn = db.pool.acquire().await.unwrap();
        let post = create(&mut conn, author, PostCategory::Transport, "general", &payload("Signal"))
            .await
            .unwrap();

        assert!(mark_resolved(&mut *conn, post.id).await.unwrap());
        let first = find_by_id(&mut *conn, post.id).await.unwrap().unwrap();
        let stamped = first.resolved_at.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        mark_resolved(&mut *conn, post.id).await.unwrap();
        let again = find_by_id(&mut *conn, post.id).await.unwrap().unwrap();
        assert_eq!(again.resolved_at, Some(stamped));

        assert!(!mark_resolved(&mut *conn, 999).await.unwrap());
    }

    #[tokio::test]
    async fn test_upvote_toggle_and_engagement() {
        let db = DbService::in_memory().await.unwrap();
        let author = seed_author(&db).await;
        let mut conn = db.pool.acquire().await.unwrap();
        let post = create(&mut conn, author, PostCategory::Safety, "general", &payload("Dark lane"))
            .await
            .unwrap();

        assert!(toggle_upvote(&mut conn, post.id, author).await.unwrap());
        add_comment(&mut conn, post.id, author, "Still broken").await.unwrap();
        let (upvotes, score) = refresh_engagement(&mut conn, post.id).await.unwrap();
        assert_eq!(upvotes, 1);
        assert_eq!(score, 3.0);

        assert!(!toggle_upvote(&mut conn, post.id, author).await.unwrap());
        assert!(upvoter_ids(&mut *conn, post.id).await.unwrap().is_empty());
        let (upvotes, score) = refresh_engagement(&mut conn, post.id).await.unwrap();
        assert_eq!(upvotes, 0);
        assert_eq!(score, 2.0);
    }

    #[tokio::test]
    async fn test_filters_and_stats() {
        let db = DbService::in_memory().await.unwrap();
        let author = seed_author(&db).await;
        let mut conn = db.pool.acquire().await.unwrap();
        create(&mut conn, author, PostCategory::Sanitation, "general", &payload("Garbage"))
            .await
            .unwrap();
        let mut urgent = payload("Open manhole");
        urgent.priority = Some(Priority::Critical);
        create(&mut conn, author, PostCategory::Sanitation, "roads", &urgent)
            .await
            .unwrap();
        create(&mut conn, author, PostCategory::Healthcare, "general", &payload("Clinic"))
            .await
            .unwrap();

        let query = PostQuery {
            category: Some(PostCategory::Sanitation),
            ..Default::default()
        };
        let rows = find_all(&mut *conn, &query).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|p| p.category == PostCategory::Sanitation));

        let query = PostQuery {
            category: Some(PostCategory::Sanitation),
            department: Some("roads".into()),
            ..Default::default()
        };
        assert_eq!(find_all(&mut *conn, &query).await.unwrap().len(), 1);

        let stats = stats(&mut conn).await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 3);
        assert_eq!(stats.critical, 1);
        assert_eq!(
            stats.by_category[0],
            CountEntry {
                key: "sanitation".into(),
                count: 2
            }
        );
    }
}
