//! Task Model (work order derived from a post)

use serde::{Deserialize, Serialize};

use super::Priority;

/// Task workflow status
///
/// Intended progression is assigned → in-progress → completed → reviewed →
/// closed, but any value may follow any other.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "kebab-case"))]
pub enum TaskStatus {
    #[default]
    Assigned,
    InProgress,
    Completed,
    Reviewed,
    Closed,
}

/// Evidence entry uploaded by the worker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkProof {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    pub uploaded_at: i64,
}

/// Evidence entry as submitted; `uploaded_at` defaults to now
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkProofInput {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<i64>,
}

/// Signature stamped by the reviewing official
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DigitalSignature {
    pub payload: String,
    pub signed_by: i64,
    pub signed_at: i64,
}

/// Review report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskReport {
    pub content: String,
    pub generated_at: i64,
}

/// Task entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Task {
    pub id: i64,
    pub post_id: i64,
    /// Joined from the post for listings
    pub post_title: Option<String>,
    /// Worker doing the job
    pub assigned_to: i64,
    /// Official who created the task
    pub assigned_by: i64,
    pub department: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub description: Option<String>,
    pub instructions: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub work_proof: Vec<WorkProof>,
    pub worker_remarks: Option<String>,
    pub official_remarks: Option<String>,
    /// Set when the worker moves the task to completed (Unix millis)
    pub completion_date: Option<i64>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub digital_signature: Option<DigitalSignature>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub report: Option<TaskReport>,
    /// Set when a report is attached (Unix millis)
    pub review_date: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create task payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskCreate {
    pub post_id: Option<i64>,
    pub assigned_to: Option<i64>,
    pub priority: Option<Priority>,
    pub description: Option<String>,
    pub instructions: Option<String>,
}

/// Worker progress update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskStatusUpdate {
    pub status: Option<TaskStatus>,
    pub worker_remarks: Option<String>,
    pub work_proof: Option<Vec<WorkProofInput>>,
}

/// Official review payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskReview {
    pub status: Option<TaskStatus>,
    pub official_remarks: Option<String>,
    /// Signature payload; signer and timestamp are stamped by the server
    pub digital_signature: Option<String>,
    /// Report body; generation time is stamped by the server
    pub report: Option<String>,
}

/// List filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub department: Option<String>,
}
