//! Database Module
//!
//! Owns the embedded SurrealDB connection and applies the schema on open.

pub mod models;
pub mod repository;

use shared::PosError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "pos";
const DATABASE: &str = "pos";

/// Database service — owns the embedded SurrealDB connection
#[derive(Clone)]
pub struct DbService {
    db: Surreal<Db>,
}

impl DbService {
    /// Open an on-disk database at `path` (RocksDB backend)
    pub async fn open(path: &str) -> Result<Self, PosError> {
        let db = Surreal::new::<RocksDb>(path)
            .await
            .map_err(|e| PosError::persistence("open database", e))?;
        Self::init(db).await
    }

    /// Open a fresh in-memory database (tests and ephemeral tooling)
    pub async fn open_in_memory() -> Result<Self, PosError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| PosError::persistence("open database", e))?;
        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> Result<Self, PosError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| PosError::persistence("select namespace", e))?;

        db.query(SCHEMA)
            .await
            .map_err(|e| PosError::persistence("apply schema", e))?
            .check()
            .map_err(|e| PosError::persistence("apply schema", e))?;

        tracing::info!("database connection established, schema applied");
        Ok(Self { db })
    }

    pub fn db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}

/// Idempotent schema: schemaless tables plus the lookup indexes the
/// lifecycle queries depend on.
const SCHEMA: &str = r#"
    DEFINE TABLE IF NOT EXISTS item SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS category SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS store SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS dining_table SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS orders SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS order_item SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS order_table SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS payment SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS order_item_order ON order_item FIELDS orderid;
    DEFINE INDEX IF NOT EXISTS order_table_table ON order_table FIELDS tableid;
    DEFINE INDEX IF NOT EXISTS payment_order ON payment FIELDS orderid;
"#;
