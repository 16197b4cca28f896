//! Data models
//!
//! Shared between the server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, all timestamps Unix millis.

pub mod post;
pub mod priority;
pub mod task;
pub mod user;

// Re-exports
pub use post::*;
pub use priority::*;
pub use task::*;
pub use user::*;
