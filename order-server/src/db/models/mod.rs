//! Database record models
//!
//! Server-internal shapes with native SurrealDB record ids. Conversions to
//! the wire-level models in the `shared` crate stringify the id.

pub mod menu_item;
pub mod order;

pub use menu_item::MenuItemRecord;
pub use order::{CounterRecord, OrderRecord};
