//! 实时推送协议类型定义
//!
//! 这些类型在 order-server 和 clients 之间共享，用于
//! 进程内（内存）和网络（TCP）通信。
//!
//! 线路格式: `[frame_type u8][len u32 LE][json payload]`

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod payload;
pub use payload::*;

/// 协议版本号
pub const PROTOCOL_VERSION: u16 = 1;

/// Broadcast topic
///
/// A topic is a named broadcast group that connections subscribe to for
/// push delivery. The placing customer's kiosk joins `customer`, the staff
/// dashboard joins `staff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Staff,
    Customer,
}

impl Topic {
    pub const ALL: [Topic; 2] = [Topic::Staff, Topic::Customer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Customer => "customer",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "staff" => Ok(Self::Staff),
            "customer" => Ok(Self::Customer),
            other => Err(format!("unknown topic: {}", other)),
        }
    }
}

/// Event names pushed to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventName {
    #[serde(rename = "new-order")]
    NewOrder,
    #[serde(rename = "order-status-updated")]
    OrderStatusUpdated,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewOrder => "new-order",
            Self::OrderStatusUpdated => "order-status-updated",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 帧类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameType {
    /// 握手消息 (client -> server)
    Hello = 0,
    /// 订阅主题 (client -> server)
    Subscribe = 1,
    /// 退订主题 (client -> server)
    Unsubscribe = 2,
    /// 业务事件推送 (server -> client)
    Event = 3,
}

impl TryFrom<u8> for FrameType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FrameType::Hello),
            1 => Ok(FrameType::Subscribe),
            2 => Ok(FrameType::Unsubscribe),
            3 => Ok(FrameType::Event),
            _ => Err(()),
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameType::Hello => write!(f, "hello"),
            FrameType::Subscribe => write!(f, "subscribe"),
            FrameType::Unsubscribe => write!(f, "unsubscribe"),
            FrameType::Event => write!(f, "event"),
        }
    }
}

/// 实时推送消息帧
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubFrame {
    pub frame_type: FrameType,
    pub payload: Vec<u8>,
}

impl HubFrame {
    pub fn new(frame_type: FrameType, payload: Vec<u8>) -> Self {
        Self {
            frame_type,
            payload,
        }
    }

    /// 创建握手帧
    pub fn hello(payload: &HelloPayload) -> Self {
        Self::new(
            FrameType::Hello,
            serde_json::to_vec(payload).expect("Failed to serialize hello payload"),
        )
    }

    /// 创建订阅帧
    pub fn subscribe(topic: Topic) -> Self {
        let payload = SubscribePayload { topic };
        Self::new(
            FrameType::Subscribe,
            serde_json::to_vec(&payload).expect("Failed to serialize subscribe payload"),
        )
    }

    /// 创建退订帧
    pub fn unsubscribe(topic: Topic) -> Self {
        let payload = SubscribePayload { topic };
        Self::new(
            FrameType::Unsubscribe,
            serde_json::to_vec(&payload).expect("Failed to serialize unsubscribe payload"),
        )
    }

    /// 创建事件推送帧
    pub fn event(payload: &OrderEventPayload) -> Self {
        Self::new(
            FrameType::Event,
            serde_json::to_vec(payload).expect("Failed to serialize event payload"),
        )
    }

    /// 解析载荷为指定类型
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}
