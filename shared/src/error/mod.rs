//! Unified error system
//!
//! - [`ErrorCode`]: standardized numeric error codes
//! - [`ErrorCategory`]: classification of errors by domain
//! - [`AppError`]: error with code, message and optional details
//! - [`ApiResponse`]: response envelope
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: User errors
//! - 4xxx: Post errors
//! - 5xxx: Task errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::PostNotFound);
//! let err = AppError::validation("title must not be empty").with_detail("field", "title");
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(2));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
