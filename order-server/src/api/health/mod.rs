//! Health Check API

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::core::ServerState;
use crate::utils::now_millis;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": now_millis(),
    }))
}
