//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Person names, post titles
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions, remarks, comments, reports
pub const MAX_NOTE_LEN: usize = 5000;

/// Short identifiers: username, phone, department, designation
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// URLs / media paths
pub const MAX_URL_LEN: usize = 2048;

/// Addresses / free-form locations
pub const MAX_ADDRESS_LEN: usize = 500;

/// Aadhaar numbers are exactly 12 digits
pub const AADHAAR_LEN: usize = 12;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required(field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string is present and non-blank, returning it trimmed.
pub fn require_present(value: &Option<String>, field: &str, max_len: usize) -> Result<String, AppError> {
    match value {
        Some(v) => {
            validate_required_text(v, field, max_len)?;
            Ok(v.trim().to_string())
        }
        None => Err(AppError::required(field)),
    }
}

/// Validate a password's length bounds.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN})"
        )));
    }
    Ok(())
}

/// Validate a 12-digit Aadhaar number.
pub fn validate_aadhaar(value: &str) -> Result<(), AppError> {
    if value.len() != AADHAAR_LEN || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::validation("aadhaar_number must be 12 digits"));
    }
    Ok(())
}

/// Reject a request body naming any field outside `allowed`.
///
/// Returns the offending field names so callers can report them.
pub fn disallowed_fields<'a>(
    body: &'a serde_json::Map<String, serde_json::Value>,
    allowed: &[&str],
) -> Vec<&'a str> {
    body.keys()
        .map(String::as_str)
        .filter(|k| !allowed.contains(k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Pothole", "title", MAX_NAME_LEN).is_ok());
        let err = validate_required_text("   ", "title", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        let err = validate_required_text(&"x".repeat(201), "title", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "phone", 5).is_ok());
        assert!(validate_optional_text(&Some("12345".into()), "phone", 5).is_ok());
        assert!(validate_optional_text(&Some("123456".into()), "phone", 5).is_err());
    }

    #[test]
    fn test_require_present_trims() {
        let v = require_present(&Some("  roads ".into()), "department", 20).unwrap();
        assert_eq!(v, "roads");
        assert!(require_present(&None, "department", 20).is_err());
        assert!(require_present(&Some("".into()), "department", 20).is_err());
    }

    #[test]
    fn test_aadhaar() {
        assert!(validate_aadhaar("123412341234").is_ok());
        assert!(validate_aadhaar("12341234123").is_err());
        assert!(validate_aadhaar("12341234123a").is_err());
    }

    #[test]
    fn test_disallowed_fields() {
        let body = serde_json::json!({"title": "x", "status": "resolved", "author_id": 3});
        let body = body.as_object().unwrap();
        let mut bad = disallowed_fields(body, &["title", "description"]);
        bad.sort();
        assert_eq!(bad, vec!["author_id", "status"]);
        assert!(disallowed_fields(body, &["title", "status", "author_id"]).is_empty());
    }
}
