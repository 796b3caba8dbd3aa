//! Shared types for the order service
//!
//! Common types that cross the process boundary: error codes and the API
//! response envelope, domain models, and the realtime hub wire protocol.
//! Used by the server and by kiosk / staff dashboard clients.

pub mod error;
pub mod models;
pub mod realtime;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use realtime::{EventName, HubFrame, Topic};
