//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult};
use shared::models::{Order, OrderStatus, Page, PlaceOrderRequest, UpdateStatusRequest};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    50
}

impl ListQuery {
    fn status_filter(&self) -> AppResult<Option<OrderStatus>> {
        self.status
            .as_deref()
            .map(|s| s.parse::<OrderStatus>().map_err(AppError::validation))
            .transpose()
    }

    fn clamped_limit(&self) -> i64 {
        self.limit.clamp(1, 200)
    }
}

/// Place a new order
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    let order = state.orders.place_order(&user, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Order placed successfully",
            order,
        )),
    ))
}

/// List all active orders (staff view, paginated, optional status filter)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Page<Order>>>> {
    if !user.role.is_staff() {
        return Err(AppError::forbidden("Staff or admin role required"));
    }
    let status = query.status_filter()?;
    let page = state
        .orders
        .list_orders(status, query.page, query.clamped_limit())
        .await?;
    Ok(Json(ApiResponse::success(page)))
}

/// List the calling customer's own orders
pub async fn my_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Page<Order>>>> {
    let page = state
        .orders
        .list_customer_orders(&user, query.page, query.clamped_limit())
        .await?;
    Ok(Json(ApiResponse::success(page)))
}

/// Track an order by id or order number (no auth: pickup screens)
pub async fn track(
    State(state): State<ServerState>,
    Path(token): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.tracking.resolve(Some(&token)).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// Track without a token: best-effort most recent active order
pub async fn track_latest(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.tracking.resolve(None).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// Get a single order (customers only see their own)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.get_order(&id, &user).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// Apply a status transition
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let requested: OrderStatus = payload.status.parse().map_err(AppError::validation)?;
    let order = state.orders.update_status(&id, requested, &user).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Order status updated successfully",
        order,
    )))
}

/// Cancel an order
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.cancel(&id, &user).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Order cancelled successfully",
        order,
    )))
}
