//! 实时推送模块
//!
//! # 架构
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     RealtimeHub                          │
//! │  topics:  DashMap<Topic, HashSet<ConnId>>                │
//! │  clients: DashMap<ConnId, mpsc::Sender<HubFrame>>        │
//! └────────────────────────┬────────────────────────────────┘
//!                          │ publish(topic, event, order)
//!              ┌───────────┴───────────┐
//!              ▼                       ▼
//!        TcpTransport            MemoryTransport
//!        (网络客户端)             (同进程/测试)
//! ```
//!
//! The hub owns no business logic and never touches the order store: it
//! maps topics to connected subscribers and fans a serialized frame out to
//! each subscriber's own ordered channel. Delivery is best-effort — only
//! connections subscribed at publish time receive the frame, and a client
//! that missed one recovers through the tracking endpoint.

mod hub;
mod transport;

pub use hub::{HubConfig, RealtimeHub};
pub use transport::{MemoryTransport, TcpTransport, read_frame_from, write_frame_to};
