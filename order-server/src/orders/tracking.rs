//! Tracking resolver
//!
//! Late-joining or reconnecting clients do not replay missed events — they
//! fetch current truth here. A token may be an internal record id or a
//! human-readable order number, with or without the `#` display marker a
//! receipt or tracking screen prepends.

use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::Order;

#[derive(Clone)]
pub struct TrackingResolver {
    orders: OrderRepository,
}

impl TrackingResolver {
    pub fn new(orders: OrderRepository) -> Self {
        Self { orders }
    }

    /// Resolve a tracking token to the current order snapshot
    ///
    /// With no token, falls back to the most recently created active order.
    /// That fallback exists for a single-terminal UI that lost its order
    /// reference and is best-effort only — with several customers ordering
    /// concurrently it is ambiguous by construction.
    pub async fn resolve(&self, token: Option<&str>) -> AppResult<Order> {
        match token {
            Some(raw) if !raw.trim().is_empty() => {
                let normalized = normalize_token(raw);
                let record = self
                    .orders
                    .find_by_id_or_number(&normalized)
                    .await
                    .map_err(|e| AppError::database(e.to_string()))?
                    .ok_or_else(|| {
                        AppError::with_message(
                            ErrorCode::OrderNotFound,
                            format!("Order {} not found", raw.trim()),
                        )
                    })?;
                Ok(record.into_shared())
            }
            _ => {
                let record = self
                    .orders
                    .find_latest_active()
                    .await
                    .map_err(|e| AppError::database(e.to_string()))?
                    .ok_or_else(|| {
                        AppError::with_message(ErrorCode::OrderNotFound, "No active orders")
                    })?;
                Ok(record.into_shared())
            }
        }
    }
}

/// Normalize a display token before lookup
///
/// Trims whitespace, strips a leading `#` marker, and uppercases bare order
/// numbers. Record ids (containing `:`) are passed through unchanged.
fn normalize_token(token: &str) -> String {
    let token = token.trim();
    let token = token.strip_prefix('#').unwrap_or(token).trim();
    if token.contains(':') {
        token.to_string()
    } else {
        token.to_ascii_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_marker_and_uppercases() {
        assert_eq!(normalize_token("#ord000123"), "ORD000123");
        assert_eq!(normalize_token("  ORD000123  "), "ORD000123");
        assert_eq!(normalize_token("# ORD000123"), "ORD000123");
    }

    #[test]
    fn test_normalize_preserves_record_ids() {
        assert_eq!(normalize_token("order:aBcDeF"), "order:aBcDeF");
    }
}
