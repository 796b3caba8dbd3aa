//! Order Record Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use shared::models::{Order, OrderLine, OrderStatus, PaymentMethod, PaymentStatus};

/// Order entity as stored in SurrealDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub order_number: String,
    pub customer_ref: String,
    pub customer_name: String,
    pub lines: Vec<OrderLine>,
    pub subtotal: f64,
    pub service_fee: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub special_instructions: Option<String>,
    pub estimated_ready_at: i64,
    #[serde(default)]
    pub completed_at: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl OrderRecord {
    /// Convert into the wire-level model (record id stringified)
    pub fn into_shared(self) -> Order {
        Order {
            id: self.id.map(|rid| rid.to_string()),
            order_number: self.order_number,
            customer_ref: self.customer_ref,
            customer_name: self.customer_name,
            lines: self.lines,
            subtotal: self.subtotal,
            service_fee: self.service_fee,
            total: self.total,
            status: self.status,
            payment_status: self.payment_status,
            payment_method: self.payment_method,
            special_instructions: self.special_instructions,
            estimated_ready_at: self.estimated_ready_at,
            completed_at: self.completed_at,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Durable monotonic counter record (`counter:order_number`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterRecord {
    pub value: i64,
}
