//! Utility modules

pub mod logger;
pub mod validation;

// Unified error types live in the shared crate; re-export for convenience
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use shared::util::now_millis;
