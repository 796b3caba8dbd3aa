//! Menu API Module
//!
//! Read-only browse endpoints. Menu management is out of scope; the order
//! core only needs authoritative price and availability lookups.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Menu router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
}
