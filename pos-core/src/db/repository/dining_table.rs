//! Dining Table Repository
//!
//! Tables are plain records; the occupancy flag is normally flipped inside
//! the order transactions, but `set_occupied` exists for recovery tooling.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{DiningTable, DiningTableCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "dining_table";
const DEFAULT_SIZE: i32 = 4;

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DiningTable>> {
        let rid = parse_record_id(id, "table")?;
        let table: Option<DiningTable> = self.base.db().select(rid).await?;
        Ok(table)
    }

    /// Find table by id, erroring when missing
    pub async fn get(&self, id: &str) -> RepoResult<DiningTable> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("table {}", id)))
    }

    /// All tables for one store, ordered by table number
    pub async fn find_by_store(&self, store_id: &str) -> RepoResult<Vec<DiningTable>> {
        let store = parse_record_id(store_id, "store")?;
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE storeid = $store ORDER BY table_no")
            .bind(("store", store))
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Create a dining table; the table number must be unique within its store
    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        if data.table_no <= 0 {
            return Err(RepoError::Validation(format!(
                "table number must be positive, got {}",
                data.table_no
            )));
        }

        let existing: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE table_no = $no AND storeid = $store")
            .bind(("no", data.table_no))
            .bind(("store", data.storeid.clone()))
            .await?
            .take(0)?;
        if !existing.is_empty() {
            return Err(RepoError::Conflict(format!(
                "Table {} already exists in this store",
                data.table_no
            )));
        }

        let table = DiningTable {
            id: None,
            table_no: data.table_no,
            size: data.size.unwrap_or(DEFAULT_SIZE),
            label: data.label,
            storeid: data.storeid,
            is_occupied: false,
        };
        let created: Option<DiningTable> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }

    /// Force the occupancy flag. Idempotent; setting the current value is a
    /// no-op rather than an error.
    pub async fn set_occupied(&self, id: &str, occupied: bool) -> RepoResult<DiningTable> {
        let rid = parse_record_id(id, "table")?;
        let updated: Vec<DiningTable> = self
            .base
            .db()
            .query("UPDATE $table SET is_occupied = $occupied RETURN AFTER")
            .bind(("table", rid))
            .bind(("occupied", occupied))
            .await?
            .take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("table {}", id)))
    }
}
