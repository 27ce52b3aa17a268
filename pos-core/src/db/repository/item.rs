//! Menu Item Repository
//!
//! Read access for the catalog plus create for menu management. Items are
//! immutable from an order's perspective; open orders keep their own price
//! snapshots.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{MenuItem, MenuItemCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "item";

#[derive(Clone)]
pub struct ItemRepository {
    base: BaseRepository,
}

impl ItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All active menu items, ordered by name
    pub async fn find_active(&self) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM item WHERE isactive = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Active items for one store, ordered by name
    pub async fn find_active_by_store(&self, store_id: &str) -> RepoResult<Vec<MenuItem>> {
        let store = parse_record_id(store_id, "store")?;
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM item WHERE isactive = true AND storeid = $store ORDER BY name")
            .bind(("store", store))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Active items in one category, ordered by name
    pub async fn find_active_by_category(&self, category_id: &str) -> RepoResult<Vec<MenuItem>> {
        let category = parse_record_id(category_id, "category")?;
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query(
                "SELECT * FROM item WHERE isactive = true AND category = $category ORDER BY name",
            )
            .bind(("category", category))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find item by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let rid = parse_record_id(id, "item")?;
        let item: Option<MenuItem> = self.base.db().select(rid).await?;
        Ok(item)
    }

    /// Create a new menu item (active by default)
    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        if !data.price.is_finite() || data.price < 0.0 {
            return Err(RepoError::Validation(format!(
                "item price must be a non-negative number, got {}",
                data.price
            )));
        }

        let item = MenuItem {
            id: None,
            name: data.name,
            price: data.price,
            category: data.category,
            storeid: data.storeid,
            isactive: true,
        };

        let created: Option<MenuItem> = self.base.db().create(TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }
}
