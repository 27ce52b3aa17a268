//! Store Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Store, StoreCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "store";

#[derive(Clone)]
pub struct StoreRepository {
    base: BaseRepository,
}

impl StoreRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All active stores, ordered by name
    pub async fn find_active(&self) -> RepoResult<Vec<Store>> {
        let stores: Vec<Store> = self
            .base
            .db()
            .query("SELECT * FROM store WHERE isactive = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(stores)
    }

    /// Find store by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Store>> {
        let rid = parse_record_id(id, "store")?;
        let store: Option<Store> = self.base.db().select(rid).await?;
        Ok(store)
    }

    /// Create a new store (active by default)
    pub async fn create(&self, data: StoreCreate) -> RepoResult<Store> {
        let store = Store {
            id: None,
            name: data.name,
            address: data.address,
            isactive: true,
        };
        let created: Option<Store> = self.base.db().create(TABLE).content(store).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create store".to_string()))
    }
}
