//! Order Repository
//!
//! The only writer of order state. Status changes go through the
//! compare-and-set `transition_status`, which delegates the race to the
//! database's atomic conditional update, so the at-most-one-winner
//! guarantee holds across server processes as well.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::OrderRecord;
use shared::models::OrderStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order
    ///
    /// A unique index on `order_number` rejects duplicates; that surfaces
    /// here as [`RepoError::Duplicate`] so the caller can regenerate the
    /// number and retry.
    pub async fn create(&self, record: OrderRecord) -> RepoResult<OrderRecord> {
        let created: Option<OrderRecord> = self
            .base
            .db()
            .create(TABLE)
            .content(record)
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("order_number_unique") {
                    RepoError::Duplicate("Order number already exists".to_string())
                } else {
                    RepoError::Database(msg)
                }
            })?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by record id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<OrderRecord>> {
        let order: Option<OrderRecord> = self.base.db().select(id.clone()).await?;
        Ok(order)
    }

    /// Find an active order by order number
    pub async fn find_by_number(&self, number: &str) -> RepoResult<Option<OrderRecord>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE order_number = $number AND is_active = true LIMIT 1")
            .bind(("number", number.to_string()))
            .await?;
        let orders: Vec<OrderRecord> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Find an active order by record id or order number
    ///
    /// A token containing a `table:key` record id resolves by id; anything
    /// else is treated as an order number.
    pub async fn find_by_id_or_number(&self, token: &str) -> RepoResult<Option<OrderRecord>> {
        if let Ok(rid) = token.parse::<RecordId>()
            && rid.table() == TABLE
        {
            let order = self.find_by_id(&rid).await?;
            return Ok(order.filter(|o| o.is_active));
        }
        self.find_by_number(token).await
    }

    /// Most recently created active order (tracking fallback)
    pub async fn find_latest_active(&self) -> RepoResult<Option<OrderRecord>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE is_active = true ORDER BY created_at DESC LIMIT 1")
            .await?;
        let orders: Vec<OrderRecord> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Compare-and-set status transition
    ///
    /// The conditional UPDATE only applies when the stored status still
    /// matches `expected`. An empty result against an existing record means
    /// a concurrent writer won the race: the caller receives
    /// [`RepoError::Conflict`] and should refetch and retry.
    pub async fn transition_status(
        &self,
        id: &RecordId,
        expected: OrderStatus,
        next: OrderStatus,
        completed_at: Option<i64>,
        updated_at: i64,
    ) -> RepoResult<OrderRecord> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $order SET status = $next, updated_at = $updated, completed_at = $completed \
                 WHERE status = $expected RETURN AFTER",
            )
            .bind(("order", id.clone()))
            .bind(("next", next))
            .bind(("updated", updated_at))
            .bind(("completed", completed_at))
            .bind(("expected", expected))
            .await?;
        let updated: Vec<OrderRecord> = result.take(0)?;

        match updated.into_iter().next() {
            Some(order) => Ok(order),
            None => match self.find_by_id(id).await? {
                Some(current) => Err(RepoError::Conflict(format!(
                    "Expected status {} but found {}",
                    expected, current.status
                ))),
                None => Err(RepoError::NotFound(format!("Order {} not found", id))),
            },
        }
    }

    /// List active orders, newest first, optional status filter
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        page: i64,
        limit: i64,
    ) -> RepoResult<(Vec<OrderRecord>, i64)> {
        let start = (page.max(1) - 1) * limit;

        let orders: Vec<OrderRecord> = match status {
            Some(s) => {
                let mut result = self
                    .base
                    .db()
                    .query(
                        "SELECT * FROM order WHERE is_active = true AND status = $status \
                         ORDER BY created_at DESC LIMIT $limit START $start",
                    )
                    .bind(("status", s))
                    .bind(("limit", limit))
                    .bind(("start", start))
                    .await?;
                result.take(0)?
            }
            None => {
                let mut result = self
                    .base
                    .db()
                    .query(
                        "SELECT * FROM order WHERE is_active = true \
                         ORDER BY created_at DESC LIMIT $limit START $start",
                    )
                    .bind(("limit", limit))
                    .bind(("start", start))
                    .await?;
                result.take(0)?
            }
        };

        let total = self.count(status).await?;
        Ok((orders, total))
    }

    /// List a customer's own active orders, newest first
    pub async fn list_by_customer(
        &self,
        customer_ref: &str,
        page: i64,
        limit: i64,
    ) -> RepoResult<(Vec<OrderRecord>, i64)> {
        let start = (page.max(1) - 1) * limit;
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE is_active = true AND customer_ref = $customer \
                 ORDER BY created_at DESC LIMIT $limit START $start",
            )
            .bind(("customer", customer_ref.to_string()))
            .bind(("limit", limit))
            .bind(("start", start))
            .await?;
        let orders: Vec<OrderRecord> = result.take(0)?;

        let mut count_result = self
            .base
            .db()
            .query(
                "SELECT count() AS total FROM order \
                 WHERE is_active = true AND customer_ref = $customer GROUP ALL",
            )
            .bind(("customer", customer_ref.to_string()))
            .await?;
        let rows: Vec<serde_json::Value> = count_result.take(0)?;
        let total = rows
            .first()
            .and_then(|row| row.get("total"))
            .and_then(|v| v.as_i64())
            .unwrap_or(0);

        Ok((orders, total))
    }

    /// Count active orders, optional status filter
    async fn count(&self, status: Option<OrderStatus>) -> RepoResult<i64> {
        let mut result = match status {
            Some(s) => {
                self.base
                    .db()
                    .query(
                        "SELECT count() AS total FROM order \
                         WHERE is_active = true AND status = $status GROUP ALL",
                    )
                    .bind(("status", s))
                    .await?
            }
            None => {
                self.base
                    .db()
                    .query("SELECT count() AS total FROM order WHERE is_active = true GROUP ALL")
                    .await?
            }
        };
        let rows: Vec<serde_json::Value> = result.take(0)?;
        Ok(rows
            .first()
            .and_then(|row| row.get("total"))
            .and_then(|v| v.as_i64())
            .unwrap_or(0))
    }

    /// Soft-delete an order (retained, excluded from default queries)
    pub async fn deactivate(&self, id: &RecordId) -> RepoResult<bool> {
        self.base
            .db()
            .query("UPDATE $order SET is_active = false")
            .bind(("order", id.clone()))
            .await?;
        Ok(true)
    }
}
