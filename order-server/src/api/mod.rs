//! HTTP API
//!
//! Per-domain routers assembled into the application router. Handlers are
//! thin: extract, delegate to the service layer, wrap in [`ApiResponse`].

pub mod health;
pub mod menu;
pub mod orders;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Build the application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(orders::router())
        .merge(menu::router())
        .merge(health::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
