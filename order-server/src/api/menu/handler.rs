//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::MenuItemRecord;
use crate::db::repository::RepoError;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::MenuItem;

/// Query params for listing menu items
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

/// List available menu items, optionally filtered by category
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<MenuItem>>>> {
    let items = state
        .menu
        .find_available(query.category.as_deref())
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let items = items
        .into_iter()
        .map(MenuItemRecord::into_shared)
        .collect();
    Ok(Json(ApiResponse::success(items)))
}

/// Get a single menu item
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let item = state
        .menu
        .find_by_id(&id)
        .await
        .map_err(|e| match e {
            RepoError::Validation(msg) => AppError::validation(msg),
            other => AppError::database(other.to_string()),
        })?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::MenuItemNotFound,
                format!("Menu item {} not found", id),
            )
        })?;
    Ok(Json(ApiResponse::success(item.into_shared())))
}
