//! Shared test harness: tempdir-backed database + assembled server state

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};
use tempfile::TempDir;

use order_server::auth::{CurrentUser, JwtService};
use order_server::core::{Config, ServerState};
use order_server::db::models::MenuItemRecord;
use order_server::realtime::RealtimeHub;
use shared::models::Role;
use shared::util::now_millis;

pub struct TestContext {
    pub state: ServerState,
    // Keeps the on-disk database alive for the duration of the test
    _tmp: TempDir,
}

pub async fn setup() -> TestContext {
    let tmp = tempfile::tempdir().expect("Failed to create tempdir");
    let db: Surreal<Db> = Surreal::new::<RocksDb>(tmp.path().join("orders.db"))
        .await
        .expect("Failed to open test database");
    db.use_ns("foodservice")
        .use_db("orders")
        .await
        .expect("Failed to select namespace");
    order_server::db::init_schema(&db)
        .await
        .expect("Failed to apply schema");

    let mut config = Config::with_overrides(tmp.path().to_string_lossy(), 0, 0);
    config.order_number_prefix = "ORD".to_string();
    config.service_fee = 5.0;

    let hub = Arc::new(RealtimeHub::new());
    let jwt = Arc::new(JwtService::default());
    let state = ServerState::with_db(config, db, hub, jwt);

    TestContext { state, _tmp: tmp }
}

pub async fn seed_menu_item(
    state: &ServerState,
    name: &str,
    price: f64,
    is_available: bool,
) -> String {
    let record = MenuItemRecord {
        id: None,
        name: name.to_string(),
        description: None,
        price,
        category: Some("mains".to_string()),
        is_available,
        prep_time_minutes: 10,
        is_veg: true,
        created_at: now_millis(),
    };
    let created = state
        .menu
        .create(record)
        .await
        .expect("Failed to seed menu item");
    created.id.expect("Seeded item missing id").to_string()
}

pub fn customer(id: &str, name: &str) -> CurrentUser {
    CurrentUser {
        principal_id: id.to_string(),
        name: name.to_string(),
        role: Role::Customer,
    }
}

pub fn staff(id: &str, name: &str) -> CurrentUser {
    CurrentUser {
        principal_id: id.to_string(),
        name: name.to_string(),
        role: Role::Staff,
    }
}
