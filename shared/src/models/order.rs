//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order lifecycle status
///
/// Transitions are validated by the server's status machine; clients must
/// treat every received order snapshot as authoritative rather than
/// deriving state locally.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Placed,
    Accepted,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Placed,
        OrderStatus::Accepted,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Placed => "PLACED",
            Self::Accepted => "ACCEPTED",
            Self::Preparing => "PREPARING",
            Self::Ready => "READY",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    /// Case-insensitive parse; rejects anything outside the fixed status set
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PLACED" => Ok(Self::Placed),
            "ACCEPTED" => Ok(Self::Accepted),
            "PREPARING" => Ok(Self::Preparing),
            "READY" => Ok(Self::Ready),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(format!("invalid order status: {}", other)),
        }
    }
}

/// Payment status (independent axis, not part of the lifecycle machine)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// Payment method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Upi,
    Wallet,
}

/// Order line
///
/// `name` and `unit_price` are captured from the menu at creation time so
/// order snapshots stay self-contained even if the menu changes later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// Menu item reference (String ID)
    pub menu_item_ref: String,
    pub name: String,
    pub quantity: i32,
    /// Authoritative unit price in currency unit, resolved server-side
    pub unit_price: f64,
    /// quantity × unit_price, rounded to 2 decimal places
    pub subtotal: f64,
}

/// Order entity (wire shape)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: Option<String>,
    /// Human-readable unique order number, distinct from the record id
    pub order_number: String,
    /// Placing customer reference
    pub customer_ref: String,
    /// Display name captured at creation (may differ from account name)
    pub customer_name: String,
    pub lines: Vec<OrderLine>,
    pub subtotal: f64,
    pub service_fee: f64,
    /// subtotal + service_fee
    pub total: f64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub special_instructions: Option<String>,
    /// Advisory pickup estimate (epoch millis); nothing fires when it passes
    pub estimated_ready_at: i64,
    /// Set exactly once, when the order enters COMPLETED
    pub completed_at: Option<i64>,
    /// Soft-delete flag; inactive orders are excluded from default queries
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

// ==================== Request DTOs ====================

/// A single requested line in a placement request
///
/// Deliberately carries no price: the server resolves the authoritative
/// price from the menu and ignores anything the client may claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub menu_item_ref: String,
    pub quantity: i32,
}

/// Place order request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub customer_name: Option<String>,
    pub items: Vec<OrderLineInput>,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

/// Update status request body
///
/// `status` is a plain string so an unknown value maps to a 400 validation
/// error instead of a body-deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// ==================== Pagination ====================

/// Pagination metadata returned with list responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

/// A page of results plus pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_format() {
        let json = serde_json::to_string(&OrderStatus::Preparing).unwrap();
        assert_eq!(json, "\"PREPARING\"");
        let status: OrderStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_status_from_str_case_insensitive() {
        assert_eq!("ready".parse::<OrderStatus>().unwrap(), OrderStatus::Ready);
        assert_eq!(
            "Completed".parse::<OrderStatus>().unwrap(),
            OrderStatus::Completed
        );
        assert!("confirmed".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_pagination_pages() {
        assert_eq!(Pagination::new(1, 10, 0).pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).pages, 2);
        assert_eq!(Pagination::new(1, 50, 120).pages, 3);
    }
}
