//! Order domain core
//!
//! - `status`: the lifecycle state machine (pure, no I/O)
//! - `money`: decimal-precise totals computation
//! - `number`: durable order number generation
//! - `service`: orchestration — validate, price, persist, broadcast
//! - `tracking`: current-truth resolution for late or reconnecting clients

pub mod money;
pub mod number;
pub mod service;
pub mod status;
pub mod tracking;

pub use number::OrderNumberGenerator;
pub use service::OrderService;
pub use tracking::TrackingResolver;
