//! Utilities
//!
//! - [`AppError`] / [`AppResult`] - re-exported from `shared::error`
//! - [`logger`] - tracing setup
//! - [`validation`] - input checks shared by services

pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
