use serde::{Deserialize, Serialize};

use super::{EventName, PROTOCOL_VERSION, Topic};
use crate::models::Order;

/// 握手载荷 (客户端 -> 服务端)
///
/// 包含客户端的协议版本信息，用于服务端进行版本校验。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelloPayload {
    /// 协议版本
    pub version: u16,
    /// 客户端名称/标识
    pub client_name: Option<String>,
}

impl HelloPayload {
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            client_name: Some(client_name.into()),
        }
    }
}

/// 订阅/退订载荷 (客户端 -> 服务端)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubscribePayload {
    pub topic: Topic,
}

/// 业务事件载荷 (服务端 -> 所有订阅者)
///
/// Every push carries a complete order snapshot so recipients apply the
/// snapshot as-is instead of incremental deltas. A client that missed an
/// event recovers through the tracking endpoint, not through replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEventPayload {
    pub event: EventName,
    pub topic: Topic,
    pub order: Order,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderStatus, PaymentMethod, PaymentStatus};

    fn sample_order() -> Order {
        Order {
            id: Some("order:abc".to_string()),
            order_number: "ORD000001".to_string(),
            customer_ref: "user:1".to_string(),
            customer_name: "Ana".to_string(),
            lines: vec![],
            subtotal: 0.0,
            service_fee: 5.0,
            total: 5.0,
            status: OrderStatus::Placed,
            payment_status: PaymentStatus::Pending,
            payment_method: PaymentMethod::Cash,
            special_instructions: None,
            estimated_ready_at: 0,
            completed_at: None,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_event_payload_roundtrip() {
        let payload = OrderEventPayload {
            event: EventName::NewOrder,
            topic: Topic::Customer,
            order: sample_order(),
        };
        let frame = crate::realtime::HubFrame::event(&payload);
        let parsed: OrderEventPayload = frame.parse_payload().unwrap();
        assert_eq!(parsed.event, EventName::NewOrder);
        assert_eq!(parsed.order.order_number, "ORD000001");
    }
}
