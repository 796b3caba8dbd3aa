//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Customer display names
pub const MAX_NAME_LEN: usize = 200;

/// Special instructions and other free-form notes
pub const MAX_NOTE_LEN: usize = 500;

/// Order numbers, tracking tokens and other short identifiers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Per-line quantity cap
pub const MAX_LINE_QUANTITY: i32 = 99;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
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
