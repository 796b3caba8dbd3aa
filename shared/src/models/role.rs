//! Role Model
//!
//! Auth is an opaque capability check: a verified request yields a principal
//! and one of these roles. Permission decisions live in the order service.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Principal role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Places and tracks own orders; may cancel own orders
    Customer,
    /// Advances order status on any order
    Staff,
    /// Staff capabilities plus administration
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Staff => "staff",
            Self::Admin => "admin",
        }
    }

    /// Staff and admin may drive status transitions on any order
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Staff | Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "staff" => Ok(Self::Staff),
            "admin" => Ok(Self::Admin),
            other => Err(format!("invalid role: {}", other)),
        }
    }
}
