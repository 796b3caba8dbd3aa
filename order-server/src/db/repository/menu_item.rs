//! Menu Item Repository
//!
//! Thin lookup collaborator for the order core. Resolving an order line
//! always goes through `find_by_id` so prices come from here, never from
//! the client request.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::MenuItemRecord;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find item by id (accepts `menu_item:key` or a bare key)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItemRecord>> {
        let rid: RecordId = if id.contains(':') {
            id.parse()
                .map_err(|_| RepoError::Validation(format!("Invalid menu item ID: {}", id)))?
        } else {
            RecordId::from_table_key(TABLE, id)
        };
        if rid.table() != TABLE {
            return Err(RepoError::Validation(format!(
                "Invalid menu item ID: {}",
                id
            )));
        }
        let item: Option<MenuItemRecord> = self.base.db().select(rid).await?;
        Ok(item)
    }

    /// List available items, optionally filtered by category
    pub async fn find_available(&self, category: Option<&str>) -> RepoResult<Vec<MenuItemRecord>> {
        let items: Vec<MenuItemRecord> = match category {
            Some(c) => {
                let mut result = self
                    .base
                    .db()
                    .query(
                        "SELECT * FROM menu_item WHERE is_available = true AND category = $category \
                         ORDER BY name",
                    )
                    .bind(("category", c.to_string()))
                    .await?;
                result.take(0)?
            }
            None => {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM menu_item WHERE is_available = true ORDER BY name")
                    .await?;
                result.take(0)?
            }
        };
        Ok(items)
    }

    /// Create a menu item (seeding and admin tooling)
    pub async fn create(&self, record: MenuItemRecord) -> RepoResult<MenuItemRecord> {
        let created: Option<MenuItemRecord> = self.base.db().create(TABLE).content(record).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }
}
