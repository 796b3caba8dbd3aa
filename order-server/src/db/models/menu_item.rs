//! Menu Item Record Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use shared::models::MenuItem;

/// Menu item entity as stored in SurrealDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub category: Option<String>,
    pub is_available: bool,
    pub prep_time_minutes: i32,
    pub is_veg: bool,
    pub created_at: i64,
}

impl MenuItemRecord {
    /// Convert into the wire-level model (record id stringified)
    pub fn into_shared(self) -> MenuItem {
        MenuItem {
            id: self.id.map(|rid| rid.to_string()),
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            is_available: self.is_available,
            prep_time_minutes: self.prep_time_minutes,
            is_veg: self.is_veg,
            created_at: self.created_at,
        }
    }
}
