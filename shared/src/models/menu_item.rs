//! Menu Item Model
//!
//! The order core treats the menu as a plain lookup collaborator: it only
//! consults `price`, `is_available` and `name` when resolving order lines.

use serde::{Deserialize, Serialize};

/// Menu item entity (wire shape)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    /// Price in currency unit
    pub price: f64,
    pub category: Option<String>,
    pub is_available: bool,
    /// Advisory preparation time in minutes
    pub prep_time_minutes: i32,
    pub is_veg: bool,
    pub created_at: i64,
}
