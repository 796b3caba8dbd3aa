//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine). Schema is bootstrapped at startup
//! with a handful of DEFINE statements; the unique index on the order
//! number is what turns a generator collision into a typed conflict
//! instead of a silent duplicate.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "foodservice";
const DATABASE: &str = "orders";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at the given path and apply the schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        init_schema(&db).await?;

        tracing::info!(path = %db_path, "Database ready (SurrealDB/RocksDB)");
        Ok(Self { db })
    }
}

/// Apply schema definitions (idempotent)
pub async fn init_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    let statements = [
        "DEFINE TABLE IF NOT EXISTS order SCHEMALESS",
        "DEFINE INDEX IF NOT EXISTS order_number_unique ON TABLE order COLUMNS order_number UNIQUE",
        "DEFINE TABLE IF NOT EXISTS menu_item SCHEMALESS",
        "DEFINE TABLE IF NOT EXISTS counter SCHEMALESS",
    ];

    for statement in statements {
        db.query(statement)
            .await
            .map_err(|e| AppError::database(format!("Schema definition failed: {e}")))?;
    }

    // Seed the order number counter if this is a fresh database
    let existing: Option<models::CounterRecord> = db
        .select(("counter", "order_number"))
        .await
        .map_err(|e| AppError::database(format!("Counter lookup failed: {e}")))?;
    if existing.is_none() {
        db.query("CREATE counter:order_number SET value = 0")
            .await
            .map_err(|e| AppError::database(format!("Counter seed failed: {e}")))?;
    }

    Ok(())
}
