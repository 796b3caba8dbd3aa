//! Order service - creation and status orchestration
//!
//! # Command Flow
//!
//! ```text
//! place_order(actor, request)
//!     ├─ 1. Validate input (non-empty lines, quantities, note length)
//!     ├─ 2. Resolve authoritative price/availability per line (menu)
//!     ├─ 3. Compute subtotal / fee / total (decimal) and pickup estimate
//!     ├─ 4. Obtain order number (retry once on collision)
//!     ├─ 5. Persist via the order store
//!     ├─ 6. Broadcast new-order snapshot to staff + customer topics
//!     └─ 7. Return the persisted order
//!
//! update_status(order_ref, requested, actor)
//!     ├─ 1. Load current order
//!     ├─ 2. Authorize (customers: cancel own orders only)
//!     ├─ 3. Validate the edge with the status machine
//!     ├─ 4. Compare-and-set transition in the store
//!     ├─ 5. Broadcast order-status-updated snapshot to both topics
//!     └─ 6. Return the updated order
//! ```
//!
//! Persistence always commits before the broadcast, and a failed or empty
//! broadcast never rolls the order back — missed subscribers recover via
//! the tracking resolver.

use std::sync::Arc;

use crate::auth::CurrentUser;
use crate::db::models::OrderRecord;
use crate::db::repository::{MenuItemRepository, OrderRepository, RepoError};
use crate::orders::{money, status};
use crate::realtime::RealtimeHub;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode, now_millis};
use shared::models::{
    Order, OrderLine, OrderStatus, Page, Pagination, PaymentMethod, PaymentStatus,
    PlaceOrderRequest,
};
use shared::realtime::{EventName, Topic};

use super::number::OrderNumberGenerator;

/// Pricing and estimation policy, taken from server configuration
#[derive(Debug, Clone)]
pub struct OrderPolicy {
    /// Flat service fee added to every order
    pub service_fee: f64,
    /// Base preparation estimate in minutes
    pub base_prep_minutes: i64,
    /// Additional estimate per order line in minutes
    pub per_line_prep_minutes: i64,
}

impl Default for OrderPolicy {
    fn default() -> Self {
        Self {
            service_fee: 5.0,
            base_prep_minutes: 15,
            per_line_prep_minutes: 2,
        }
    }
}

/// Order service
///
/// Holds its collaborators by explicit injection; the hub in particular is
/// constructed once per process and passed in, never fetched from ambient
/// state.
#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    menu: MenuItemRepository,
    hub: Arc<RealtimeHub>,
    numbers: OrderNumberGenerator,
    policy: OrderPolicy,
}

impl OrderService {
    pub fn new(
        orders: OrderRepository,
        menu: MenuItemRepository,
        hub: Arc<RealtimeHub>,
        numbers: OrderNumberGenerator,
        policy: OrderPolicy,
    ) -> Self {
        Self {
            orders,
            menu,
            hub,
            numbers,
            policy,
        }
    }

    /// Place a new order
    ///
    /// Line prices come from the menu collaborator; anything the client
    /// claims about prices is ignored.
    pub async fn place_order(
        &self,
        actor: &CurrentUser,
        request: PlaceOrderRequest,
    ) -> AppResult<Order> {
        if request.items.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::OrderEmpty,
                "Order must contain at least one item",
            ));
        }

        let customer_name = request
            .customer_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| actor.name.clone());
        validate_required_text(&customer_name, "customer_name", MAX_NAME_LEN)?;
        validate_optional_text(
            &request.special_instructions,
            "special_instructions",
            MAX_NOTE_LEN,
        )?;

        // Resolve authoritative price and availability per requested line
        let mut lines = Vec::with_capacity(request.items.len());
        for input in &request.items {
            let item = self
                .menu
                .find_by_id(&input.menu_item_ref)
                .await
                .map_err(map_menu_error)?
                .ok_or_else(|| {
                    AppError::with_message(
                        ErrorCode::MenuItemNotFound,
                        format!("Menu item {} not found", input.menu_item_ref),
                    )
                })?;

            if !item.is_available {
                return Err(AppError::with_message(
                    ErrorCode::ItemUnavailable,
                    format!("Menu item {} is not available", item.name),
                ));
            }

            let subtotal = money::line_subtotal(item.price, input.quantity)?;
            let menu_item_ref = item
                .id
                .as_ref()
                .map(|rid| rid.to_string())
                .unwrap_or_else(|| input.menu_item_ref.clone());
            lines.push(OrderLine {
                menu_item_ref,
                name: item.name,
                quantity: input.quantity,
                unit_price: item.price,
                subtotal,
            });
        }

        let (subtotal, total) = money::order_totals(&lines, self.policy.service_fee)?;

        let now = now_millis();
        let estimate_minutes =
            self.policy.base_prep_minutes + self.policy.per_line_prep_minutes * lines.len() as i64;
        let estimated_ready_at = now + estimate_minutes * 60_000;

        let record = OrderRecord {
            id: None,
            order_number: String::new(),
            customer_ref: actor.principal_id.clone(),
            customer_name,
            lines,
            subtotal,
            service_fee: self.policy.service_fee,
            total,
            status: OrderStatus::Placed,
            payment_status: PaymentStatus::Pending,
            payment_method: PaymentMethod::Cash,
            special_instructions: request.special_instructions,
            estimated_ready_at,
            completed_at: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        // The generator's degraded fallback can collide; regenerate once
        // before surfacing the conflict to the caller.
        let mut attempt = 0;
        let created = loop {
            let mut candidate = record.clone();
            candidate.order_number = self.numbers.next().await;
            match self.orders.create(candidate).await {
                Ok(created) => break created,
                Err(RepoError::Duplicate(_)) if attempt == 0 => {
                    attempt += 1;
                    tracing::warn!("Order number collision, regenerating");
                }
                Err(RepoError::Duplicate(msg)) => {
                    return Err(AppError::with_message(ErrorCode::OrderNumberCollision, msg));
                }
                Err(e) => return Err(AppError::database(e.to_string())),
            }
        };

        let order = created.into_shared();
        tracing::info!(
            order_number = %order.order_number,
            total = order.total,
            "Order placed"
        );
        self.publish_snapshot(EventName::NewOrder, &order);
        Ok(order)
    }

    /// Apply a validated status transition
    ///
    /// Customers may only cancel their own orders; staff and admin drive
    /// every transition. The stored status the caller saw acts as the
    /// compare-and-set expectation, so a racing writer surfaces as a 409
    /// instead of a lost update.
    pub async fn update_status(
        &self,
        order_ref: &str,
        requested: OrderStatus,
        actor: &CurrentUser,
    ) -> AppResult<Order> {
        let current = self
            .orders
            .find_by_id_or_number(order_ref)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::OrderNotFound,
                    format!("Order {} not found", order_ref),
                )
            })?;

        if !actor.role.is_staff() {
            if requested != OrderStatus::Cancelled {
                return Err(AppError::forbidden("Only staff may advance order status"));
            }
            if current.customer_ref != actor.principal_id {
                return Err(AppError::forbidden(
                    "Customers may only cancel their own orders",
                ));
            }
        }

        let next = status::transition(current.status, requested)
            .map_err(|e| AppError::with_message(ErrorCode::InvalidTransition, e.to_string()))?;

        let id = current
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Stored order is missing its record id"))?;
        let now = now_millis();
        let completed_at = (next == OrderStatus::Completed).then_some(now);

        let updated = self
            .orders
            .transition_status(&id, current.status, next, completed_at, now)
            .await
            .map_err(|e| match e {
                RepoError::Conflict(msg) => AppError::with_message(ErrorCode::UpdateConflict, msg),
                RepoError::NotFound(msg) => AppError::with_message(ErrorCode::OrderNotFound, msg),
                other => AppError::database(other.to_string()),
            })?;

        let order = updated.into_shared();
        tracing::info!(
            order_number = %order.order_number,
            from = %current.status,
            to = %order.status,
            operator = %actor.principal_id,
            "Order status updated"
        );
        self.publish_snapshot(EventName::OrderStatusUpdated, &order);
        Ok(order)
    }

    /// Cancel an order (sugar over `update_status` targeting Cancelled)
    pub async fn cancel(&self, order_ref: &str, actor: &CurrentUser) -> AppResult<Order> {
        self.update_status(order_ref, OrderStatus::Cancelled, actor)
            .await
    }

    /// Fetch one order; customers only see their own (as not-found)
    pub async fn get_order(&self, order_ref: &str, actor: &CurrentUser) -> AppResult<Order> {
        let record = self
            .orders
            .find_by_id_or_number(order_ref)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .filter(|order| actor.role.is_staff() || order.customer_ref == actor.principal_id)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::OrderNotFound,
                    format!("Order {} not found", order_ref),
                )
            })?;
        Ok(record.into_shared())
    }

    /// Staff view: all active orders, newest first, optional status filter
    pub async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        page: i64,
        limit: i64,
    ) -> AppResult<Page<Order>> {
        let (records, total) = self
            .orders
            .list(status, page, limit)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        Ok(Page {
            data: records.into_iter().map(OrderRecord::into_shared).collect(),
            pagination: Pagination::new(page, limit, total),
        })
    }

    /// The calling customer's own active orders, newest first
    pub async fn list_customer_orders(
        &self,
        actor: &CurrentUser,
        page: i64,
        limit: i64,
    ) -> AppResult<Page<Order>> {
        let (records, total) = self
            .orders
            .list_by_customer(&actor.principal_id, page, limit)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        Ok(Page {
            data: records.into_iter().map(OrderRecord::into_shared).collect(),
            pagination: Pagination::new(page, limit, total),
        })
    }

    /// Broadcast a full order snapshot to the staff and customer topics
    ///
    /// Best-effort by contract: the order is already committed, so delivery
    /// problems are logged and swallowed.
    fn publish_snapshot(&self, event: EventName, order: &Order) {
        for topic in Topic::ALL {
            let delivered = self.hub.publish(topic, event, order);
            tracing::debug!(
                event = %event,
                topic = %topic,
                delivered,
                order_number = %order.order_number,
                "Broadcast order snapshot"
            );
        }
    }
}

/// Map menu repository failures into the order-service taxonomy
fn map_menu_error(e: RepoError) -> AppError {
    match e {
        RepoError::Validation(msg) => AppError::validation(msg),
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::MenuItemNotFound, msg),
        other => AppError::database(other.to_string()),
    }
}
