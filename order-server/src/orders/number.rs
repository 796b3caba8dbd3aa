//! Order number generation
//!
//! Human-readable order numbers: a configurable prefix plus a zero-padded
//! 6-digit sequence drawn from a durable counter record. The increment is a
//! single UPDATE statement, so two concurrent callers can never read the
//! same value.
//!
//! # Degraded mode
//!
//! If the counter cannot be read or advanced, the generator falls back to a
//! timestamp-derived value that is *probably* unique. This is a documented
//! degraded-uniqueness mode, not a correctness guarantee: the unique index
//! on `order_number` still rejects a collision, and order creation treats
//! that rejection as a retryable conflict.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::CounterRecord;
use crate::db::repository::{RepoError, RepoResult};
use shared::util::now_millis;

#[derive(Clone)]
pub struct OrderNumberGenerator {
    db: Surreal<Db>,
    prefix: String,
}

impl OrderNumberGenerator {
    pub fn new(db: Surreal<Db>, prefix: impl Into<String>) -> Self {
        Self {
            db,
            prefix: prefix.into(),
        }
    }

    /// Produce the next order number
    pub async fn next(&self) -> String {
        match self.increment().await {
            Ok(sequence) => format!("{}{:06}", self.prefix, sequence),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Order counter unavailable, falling back to timestamp-derived number"
                );
                format!("{}{:06}", self.prefix, now_millis() % 1_000_000)
            }
        }
    }

    /// Atomically advance the durable counter and return the new value
    async fn increment(&self) -> RepoResult<i64> {
        let mut result = self
            .db
            .query("UPDATE counter:order_number SET value += 1 RETURN AFTER")
            .await?;
        let rows: Vec<CounterRecord> = result.take(0)?;
        rows.into_iter().next().map(|row| row.value).ok_or_else(|| {
            RepoError::NotFound("counter:order_number record missing".to_string())
        })
    }
}
