//! Realtime hub - 主题订阅与广播
//!
//! 维护 topic -> 订阅连接集合 的映射，将订单快照帧广播给所有订阅者。
//! 每个连接持有独立的有序通道，同一 topic 上按发布顺序投递。

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::realtime::transport::{MemoryTransport, TcpTransport};
use crate::utils::AppError;
use shared::models::Order;
use shared::realtime::{
    EventName, FrameType, HelloPayload, HubFrame, OrderEventPayload, SubscribePayload, Topic,
};

/// Hub configuration
#[derive(Debug, Clone)]
pub struct HubConfig {
    pub tcp_listen_addr: String,
    /// Capacity of each per-connection channel (default: 256)
    pub channel_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            tcp_listen_addr: "0.0.0.0:8081".to_string(),
            channel_capacity: 256,
        }
    }
}

/// 实时推送中心
///
/// # 职责
///
/// - 订阅管理 (subscribe, unsubscribe, 断线自动清理)
/// - 广播 (publish: 每次发布对每个订阅连接至多投递一次)
/// - 传输层 (TCP / Memory)
///
/// The hub is constructed once per process and injected into the order
/// service; nothing reaches it through ambient state.
#[derive(Debug, Clone)]
pub struct RealtimeHub {
    /// 已连接客户端 (Connection ID -> per-connection ordered channel)
    clients: Arc<DashMap<String, mpsc::Sender<HubFrame>>>,
    /// 订阅关系 (Topic -> Connection IDs)
    topics: Arc<DashMap<Topic, HashSet<String>>>,
    config: HubConfig,
    /// 关闭信号令牌
    shutdown_token: CancellationToken,
}

impl RealtimeHub {
    /// Create a hub with default configuration
    pub fn new() -> Self {
        Self::from_config(HubConfig::default())
    }

    /// Create a hub from configuration
    pub fn from_config(config: HubConfig) -> Self {
        Self {
            clients: Arc::new(DashMap::new()),
            topics: Arc::new(DashMap::new()),
            config,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Register a connection and hand back its ordered receive channel
    pub fn register(&self, conn_id: &str) -> mpsc::Receiver<HubFrame> {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity);
        self.clients.insert(conn_id.to_string(), tx);
        rx
    }

    /// Remove a connection and all of its subscriptions
    ///
    /// Called on disconnect, so a reconnect cycle never leaks subscriptions.
    pub fn unregister(&self, conn_id: &str) {
        self.clients.remove(conn_id);
        for mut entry in self.topics.iter_mut() {
            entry.value_mut().remove(conn_id);
        }
        tracing::debug!(conn_id = %conn_id, "Connection unregistered");
    }

    /// Subscribe a connection to a topic
    pub fn subscribe(&self, conn_id: &str, topic: Topic) {
        self.topics
            .entry(topic)
            .or_default()
            .insert(conn_id.to_string());
        tracing::debug!(conn_id = %conn_id, topic = %topic, "Subscribed");
    }

    /// Unsubscribe a connection from a topic
    pub fn unsubscribe(&self, conn_id: &str, topic: Topic) {
        if let Some(mut members) = self.topics.get_mut(&topic) {
            members.remove(conn_id);
        }
        tracing::debug!(conn_id = %conn_id, topic = %topic, "Unsubscribed");
    }

    /// Number of connections currently subscribed to a topic
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.topics.get(&topic).map(|m| m.len()).unwrap_or(0)
    }

    /// Broadcast an order snapshot to every subscriber of a topic
    ///
    /// At-most-once per connection per call. A topic with zero subscribers
    /// is a silent no-op, not an error — late clients resolve current truth
    /// through the tracking endpoint. A full or closed per-connection
    /// channel drops that single delivery; the publisher never fails.
    ///
    /// Returns the number of connections the frame was handed to.
    pub fn publish(&self, topic: Topic, event: EventName, order: &Order) -> usize {
        let Some(members) = self.topics.get(&topic) else {
            return 0;
        };

        let payload = OrderEventPayload {
            event,
            topic,
            order: order.clone(),
        };
        let frame = HubFrame::event(&payload);

        let mut delivered = 0;
        for conn_id in members.iter() {
            let Some(sender) = self.clients.get(conn_id) else {
                continue;
            };
            match sender.try_send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        conn_id = %conn_id,
                        topic = %topic,
                        event = %event,
                        "Connection channel full, event dropped"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::debug!(conn_id = %conn_id, "Connection channel closed");
                }
            }
        }
        delivered
    }

    /// Create an in-process subscriber connection (same-process clients, tests)
    pub fn memory_transport(&self) -> MemoryTransport {
        let conn_id = Uuid::new_v4().to_string();
        let rx = self.register(&conn_id);
        MemoryTransport::new(conn_id, rx)
    }

    /// Get the shutdown token (for monitoring shutdown signals)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// Gracefully shut down the hub and its TCP listener
    pub fn shutdown(&self) {
        tracing::info!("Shutting down realtime hub");
        self.shutdown_token.cancel();
    }

    /// Start the TCP listener for network subscribers
    ///
    /// 1. Accepts connections
    /// 2. Reads Subscribe/Unsubscribe control frames from clients
    /// 3. Forwards published event frames over each connection's channel
    /// 4. Cleans up subscriptions on disconnect or shutdown
    pub async fn start_tcp_server(&self) -> Result<(), AppError> {
        let listener = TcpListener::bind(&self.config.tcp_listen_addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind: {}", e)))?;

        tracing::info!(
            "Realtime hub TCP server listening on {}",
            self.config.tcp_listen_addr
        );

        loop {
            tokio::select! {
                // Listen for shutdown signal
                _ = self.shutdown_token.cancelled() => {
                    tracing::info!("Realtime hub TCP server shutting down");
                    break;
                }

                // Accept new connections
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            tracing::info!("Client connected: {}", addr);
                            let hub = self.clone();
                            tokio::spawn(async move {
                                hub.handle_connection(stream, addr).await;
                            });
                        }
                        Err(e) => {
                            tracing::error!("Failed to accept connection: {}", e);
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Serve one TCP connection until disconnect or shutdown
    async fn handle_connection(&self, stream: tokio::net::TcpStream, addr: std::net::SocketAddr) {
        let conn_id = Uuid::new_v4().to_string();
        let mut rx = self.register(&conn_id);
        let transport = TcpTransport::from_stream(stream);

        // Forward published frames to this client (server → client)
        let writer = transport.clone();
        let write_shutdown = self.shutdown_token.clone();
        let write_task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = write_shutdown.cancelled() => {
                        break;
                    }
                    frame = rx.recv() => {
                        match frame {
                            Some(frame) => {
                                if let Err(e) = writer.write_frame(&frame).await {
                                    tracing::info!("Client {} disconnected: {}", addr, e);
                                    break;
                                }
                            }
                            // Hub dropped the sender
                            None => break,
                        }
                    }
                }
            }
        });

        // Read control frames from the client (client → server)
        loop {
            tokio::select! {
                _ = self.shutdown_token.cancelled() => {
                    break;
                }
                read_result = transport.read_frame() => {
                    match read_result {
                        Ok(frame) => self.handle_control_frame(&conn_id, &addr, frame),
                        Err(e) => {
                            tracing::info!("Client {} read error: {}", addr, e);
                            break;
                        }
                    }
                }
            }
        }

        self.unregister(&conn_id);
        write_task.abort();
    }

    /// Apply one client control frame
    fn handle_control_frame(&self, conn_id: &str, addr: &std::net::SocketAddr, frame: HubFrame) {
        match frame.frame_type {
            FrameType::Hello => match frame.parse_payload::<HelloPayload>() {
                Ok(hello) => {
                    tracing::debug!(
                        conn_id = %conn_id,
                        version = hello.version,
                        client = ?hello.client_name,
                        "Client hello"
                    );
                }
                Err(e) => tracing::warn!("Client {} sent malformed hello: {}", addr, e),
            },
            FrameType::Subscribe => match frame.parse_payload::<SubscribePayload>() {
                Ok(payload) => self.subscribe(conn_id, payload.topic),
                Err(e) => tracing::warn!("Client {} sent malformed subscribe: {}", addr, e),
            },
            FrameType::Unsubscribe => match frame.parse_payload::<SubscribePayload>() {
                Ok(payload) => self.unsubscribe(conn_id, payload.topic),
                Err(e) => tracing::warn!("Client {} sent malformed unsubscribe: {}", addr, e),
            },
            // Clients do not publish events
            FrameType::Event => {
                tracing::warn!("Client {} attempted to publish an event frame", addr);
            }
        }
    }
}

impl Default for RealtimeHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderStatus, PaymentMethod, PaymentStatus};

    fn sample_order(status: OrderStatus) -> Order {
        Order {
            id: Some("order:test".to_string()),
            order_number: "ORD000001".to_string(),
            customer_ref: "user:1".to_string(),
            customer_name: "Ana".to_string(),
            lines: vec![],
            subtotal: 10.0,
            service_fee: 5.0,
            total: 15.0,
            status,
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

    #[tokio::test]
    async fn test_publish_reaches_all_subscribers_once() {
        let hub = RealtimeHub::new();
        let t1 = hub.memory_transport();
        let t2 = hub.memory_transport();
        hub.subscribe(t1.connection_id(), Topic::Staff);
        hub.subscribe(t2.connection_id(), Topic::Staff);

        let order = sample_order(OrderStatus::Placed);
        let delivered = hub.publish(Topic::Staff, EventName::NewOrder, &order);
        assert_eq!(delivered, 2);

        for transport in [&t1, &t2] {
            let frame = transport.read_frame().await.unwrap();
            assert_eq!(frame.frame_type, FrameType::Event);
            let payload: OrderEventPayload = frame.parse_payload().unwrap();
            assert_eq!(payload.event, EventName::NewOrder);
            assert_eq!(payload.order.order_number, "ORD000001");
            // Exactly once per publish
            assert!(transport.try_read_frame().is_none());
        }
    }

    #[tokio::test]
    async fn test_publish_only_reaches_matching_topic() {
        let hub = RealtimeHub::new();
        let staff = hub.memory_transport();
        let customer = hub.memory_transport();
        hub.subscribe(staff.connection_id(), Topic::Staff);
        hub.subscribe(customer.connection_id(), Topic::Customer);

        let order = sample_order(OrderStatus::Accepted);
        let delivered = hub.publish(Topic::Staff, EventName::OrderStatusUpdated, &order);
        assert_eq!(delivered, 1);

        assert!(staff.read_frame().await.is_some());
        assert!(customer.try_read_frame().is_none());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let hub = RealtimeHub::new();
        let order = sample_order(OrderStatus::Placed);
        assert_eq!(hub.publish(Topic::Customer, EventName::NewOrder, &order), 0);
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_publish() {
        let hub = RealtimeHub::new();
        let order = sample_order(OrderStatus::Ready);
        hub.publish(Topic::Staff, EventName::OrderStatusUpdated, &order);

        let late = hub.memory_transport();
        hub.subscribe(late.connection_id(), Topic::Staff);
        assert!(late.try_read_frame().is_none());

        // But the next publish reaches it
        let delivered = hub.publish(Topic::Staff, EventName::OrderStatusUpdated, &order);
        assert_eq!(delivered, 1);
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let hub = RealtimeHub::new();
        let t = hub.memory_transport();
        hub.subscribe(t.connection_id(), Topic::Customer);
        hub.unsubscribe(t.connection_id(), Topic::Customer);

        let order = sample_order(OrderStatus::Placed);
        assert_eq!(hub.publish(Topic::Customer, EventName::NewOrder, &order), 0);
    }

    #[tokio::test]
    async fn test_unregister_cleans_all_topics() {
        let hub = RealtimeHub::new();
        let t = hub.memory_transport();
        hub.subscribe(t.connection_id(), Topic::Staff);
        hub.subscribe(t.connection_id(), Topic::Customer);
        assert_eq!(hub.subscriber_count(Topic::Staff), 1);

        hub.unregister(t.connection_id());
        assert_eq!(hub.subscriber_count(Topic::Staff), 0);
        assert_eq!(hub.subscriber_count(Topic::Customer), 0);
    }

    #[tokio::test]
    async fn test_per_connection_order_preserved() {
        let hub = RealtimeHub::new();
        let t = hub.memory_transport();
        hub.subscribe(t.connection_id(), Topic::Customer);

        for status in [
            OrderStatus::Placed,
            OrderStatus::Accepted,
            OrderStatus::Preparing,
        ] {
            let order = sample_order(status);
            hub.publish(Topic::Customer, EventName::OrderStatusUpdated, &order);
        }

        for expected in [
            OrderStatus::Placed,
            OrderStatus::Accepted,
            OrderStatus::Preparing,
        ] {
            let frame = t.read_frame().await.unwrap();
            let payload: OrderEventPayload = frame.parse_payload().unwrap();
            assert_eq!(payload.order.status, expected);
        }
    }
}
