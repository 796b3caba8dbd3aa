//! Unified error codes
//!
//! This module defines all error codes used by the order server and its
//! clients. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 6xxx: Menu errors
//! - 9xxx: System errors

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Status transition is not permitted
    InvalidTransition = 4002,
    /// Lost a concurrent status update race (retryable)
    UpdateConflict = 4003,
    /// Menu item is missing or not available for ordering
    ItemUnavailable = 4004,
    /// Order number collision (retryable)
    OrderNumberCollision = 4005,
    /// Order contains no items
    OrderEmpty = 4006,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Service temporarily unavailable
    ServiceUnavailable = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::NotAuthenticated => "Authentication required",
            Self::TokenExpired => "Token expired",
            Self::TokenInvalid => "Invalid token",
            Self::PermissionDenied => "Permission denied",
            Self::RoleRequired => "Required role is missing",
            Self::OrderNotFound => "Order not found",
            Self::InvalidTransition => "Status transition not permitted",
            Self::UpdateConflict => "Order was updated concurrently, refetch and retry",
            Self::ItemUnavailable => "Menu item is not available",
            Self::OrderNumberCollision => "Order number collision, retry the order",
            Self::OrderEmpty => "Order must contain at least one item",
            Self::MenuItemNotFound => "Menu item not found",
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ServiceUnavailable => "Service temporarily unavailable",
        }
    }

    /// Get the HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidTransition
            | Self::ItemUnavailable
            | Self::OrderEmpty => StatusCode::BAD_REQUEST,
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }
            Self::PermissionDenied | Self::RoleRequired => StatusCode::FORBIDDEN,
            Self::NotFound | Self::OrderNotFound | Self::MenuItemNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists | Self::UpdateConflict | Self::OrderNumberCollision => {
                StatusCode::CONFLICT
            }
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Unknown | Self::InternalError | Self::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 value into [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),
            1001 => Ok(Self::NotAuthenticated),
            1003 => Ok(Self::TokenExpired),
            1004 => Ok(Self::TokenInvalid),
            2001 => Ok(Self::PermissionDenied),
            2002 => Ok(Self::RoleRequired),
            4001 => Ok(Self::OrderNotFound),
            4002 => Ok(Self::InvalidTransition),
            4003 => Ok(Self::UpdateConflict),
            4004 => Ok(Self::ItemUnavailable),
            4005 => Ok(Self::OrderNumberCollision),
            4006 => Ok(Self::OrderEmpty),
            6001 => Ok(Self::MenuItemNotFound),
            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::DatabaseError),
            9003 => Ok(Self::ServiceUnavailable),
            other => Err(InvalidErrorCode(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::InvalidTransition.code(), 4002);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_roundtrip_u16() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::NotAuthenticated,
            ErrorCode::PermissionDenied,
            ErrorCode::UpdateConflict,
            ErrorCode::ItemUnavailable,
            ErrorCode::MenuItemNotFound,
            ErrorCode::ServiceUnavailable,
        ] {
            let value: u16 = code.into();
            assert_eq!(ErrorCode::try_from(value).unwrap(), code);
        }
    }

    #[test]
    fn test_invalid_code_rejected() {
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            ErrorCode::InvalidTransition.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::UpdateConflict.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::OrderNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::PermissionDenied.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ErrorCode::ServiceUnavailable.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");
        let code: ErrorCode = serde_json::from_str("4003").unwrap();
        assert_eq!(code, ErrorCode::UpdateConflict);
    }
}
