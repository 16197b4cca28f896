//! Post Model (citizen-filed civic issue)

use serde::{Deserialize, Serialize};

use super::Priority;

/// Issue category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PostCategory {
    Infrastructure,
    Healthcare,
    Education,
    Transport,
    Sanitation,
    Safety,
    Other,
}

/// Post workflow status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "kebab-case"))]
pub enum PostStatus {
    #[default]
    Pending,
    Assigned,
    InProgress,
    Resolved,
    Rejected,
}

/// Geographic position of the issue
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Image or video attachment
///
/// `url` comes from the blob store; `base64_data` is an optional inline
/// fallback some clients send along with it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaAttachment {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64_data: Option<String>,
}

/// Default department for posts not routed anywhere yet
pub const DEFAULT_DEPARTMENT: &str = "general";

/// Post entity
///
/// `upvote_count`, `comment_count` and `author_name` are computed by the
/// select query, not stored on the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: PostCategory,
    pub priority: Priority,
    pub status: PostStatus,
    pub location: String,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub coordinates: Option<Coordinates>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub images: Vec<MediaAttachment>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub videos: Vec<MediaAttachment>,
    pub author_id: i64,
    pub author_name: Option<String>,
    /// Worker currently responsible for the issue
    pub assigned_to: Option<i64>,
    pub department: String,
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub resolution_notes: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub resolution_images: Vec<String>,
    pub upvote_count: i64,
    pub comment_count: i64,
    pub engagement_score: f64,
    /// Deadline (Unix millis)
    pub deadline: Option<i64>,
    /// First transition to resolved (Unix millis)
    pub resolved_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Comment on a post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PostComment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub author_name: Option<String>,
    pub text: String,
    pub created_at: i64,
}

/// Post with its upvoters and comment thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub upvotes: Vec<i64>,
    pub comments: Vec<PostComment>,
}

/// Create post payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostCreate {
    pub title: String,
    pub description: String,
    pub category: Option<PostCategory>,
    pub priority: Option<Priority>,
    pub location: String,
    pub coordinates: Option<Coordinates>,
    pub images: Vec<MediaAttachment>,
    pub videos: Vec<MediaAttachment>,
    pub department: Option<String>,
    pub deadline: Option<i64>,
}

/// General post update payload
///
/// Which fields a caller may set is decided per caller; see
/// [`PostUpdate::AUTHOR_FIELDS`] and [`PostUpdate::OFFICIAL_FIELDS`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<PostCategory>,
    pub location: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub images: Option<Vec<MediaAttachment>>,
    pub videos: Option<Vec<MediaAttachment>>,
    pub priority: Option<Priority>,
    pub department: Option<String>,
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub deadline: Option<i64>,
}

impl PostUpdate {
    /// Fields the author of a post may change
    pub const AUTHOR_FIELDS: &'static [&'static str] = &[
        "title",
        "description",
        "category",
        "location",
        "coordinates",
        "images",
        "videos",
    ];

    /// Fields officials and admins may change on any post
    pub const OFFICIAL_FIELDS: &'static [&'static str] = &[
        "priority",
        "department",
        "estimated_cost",
        "actual_cost",
        "deadline",
    ];
}

/// Official status update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostStatusUpdate {
    pub status: Option<PostStatus>,
    pub resolution_notes: Option<String>,
    pub resolution_images: Option<Vec<String>>,
    pub assigned_to: Option<i64>,
}

/// List filters (AND-combined)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostQuery {
    pub status: Option<PostStatus>,
    pub category: Option<PostCategory>,
    pub priority: Option<Priority>,
    pub department: Option<String>,
}

/// Add comment payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentCreate {
    pub text: String,
}

/// Result of an upvote toggle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpvoteResult {
    /// Whether the caller is an upvoter after the toggle
    pub upvoted: bool,
    pub upvote_count: i64,
    pub engagement_score: f64,
}

/// Count for one key of a breakdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CountEntry {
    pub key: String,
    pub count: i64,
}

/// Dashboard overview of all posts
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostStats {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub resolved: i64,
    pub critical: i64,
    pub by_category: Vec<CountEntry>,
    pub by_priority: Vec<CountEntry>,
}

/// Engagement weight of one upvote
pub const UPVOTE_WEIGHT: f64 = 1.0;
/// Engagement weight of one comment
pub const COMMENT_WEIGHT: f64 = 2.0;
/// Engagement weight of one whole day since creation
pub const AGE_DAY_WEIGHT: f64 = 0.1;

/// Engagement score: upvotes·1 + comments·2 + whole days since creation·0.1
pub fn engagement_score(upvotes: i64, comments: i64, age_days: i64) -> f64 {
    upvotes as f64 * UPVOTE_WEIGHT + comments as f64 * COMMENT_WEIGHT + age_days as f64 * AGE_DAY_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&PostStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        let status: PostStatus = serde_json::from_str("\"resolved\"").unwrap();
        assert_eq!(status, PostStatus::Resolved);
    }

    #[test]
    fn test_unknown_category_rejected() {
        assert!(serde_json::from_str::<PostCategory>("\"potholes\"").is_err());
        let c: PostCategory = serde_json::from_str("\"sanitation\"").unwrap();
        assert_eq!(c, PostCategory::Sanitation);
    }

    #[test]
    fn test_engagement_score_weights() {
        assert_eq!(engagement_score(0, 0, 0), 0.0);
        assert_eq!(engagement_score(3, 0, 0), 3.0);
        assert_eq!(engagement_score(0, 2, 0), 4.0);
        assert!((engagement_score(1, 1, 10) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_attachment_without_fallback_omits_field() {
        let media = MediaAttachment {
            url: "https://cdn.example/pothole.jpg".into(),
            base64_data: None,
        };
        let json = serde_json::to_string(&media).unwrap();
        assert_eq!(json, r#"{"url":"https://cdn.example/pothole.jpg"}"#);
    }

    #[test]
    fn test_create_payload_defaults_missing_fields() {
        let payload: PostCreate = serde_json::from_str(r#"{"title":"Broken light"}"#).unwrap();
        assert_eq!(payload.title, "Broken light");
        assert!(payload.description.is_empty());
        assert!(payload.category.is_none());
        assert!(payload.images.is_empty());
    }
}
