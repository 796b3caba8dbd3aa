//! Order API Module
//!
//! Status changes go through the single authorized PATCH route; there is no
//! unauthenticated update path.

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // Place order / staff list
        .route("/", post(handler::create).get(handler::list))
        // The calling customer's own orders
        .route("/my", get(handler::my_orders))
        // 追踪查询：无需认证（取餐屏/小票扫码）
        .route("/track", get(handler::track_latest))
        .route("/track/{token}", get(handler::track))
        // Order detail
        .route("/{id}", get(handler::get_by_id))
        // Status transition (staff/admin; customers may only cancel)
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/cancel", patch(handler::cancel))
}
