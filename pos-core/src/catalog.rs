//! Catalog Service
//!
//! Read-mostly facade over items, categories, stores and dining tables.
//! The order flow only ever reads the catalog; price snapshots are taken
//! when a line is added to a cart, so later menu edits never touch open
//! orders.

use crate::db::DbService;
use crate::db::models::{
    Category, CategoryCreate, DiningTable, DiningTableCreate, MenuItem, MenuItemCreate, Store,
    StoreCreate,
};
use crate::db::repository::{
    CategoryRepository, DiningTableRepository, ItemRepository, RepoError, StoreRepository,
};
use shared::{PosError, PosResult};

#[derive(Clone)]
pub struct CatalogService {
    items: ItemRepository,
    categories: CategoryRepository,
    stores: StoreRepository,
    tables: DiningTableRepository,
}

impl CatalogService {
    pub fn new(db: &DbService) -> Self {
        Self {
            items: ItemRepository::new(db.db()),
            categories: CategoryRepository::new(db.db()),
            stores: StoreRepository::new(db.db()),
            tables: DiningTableRepository::new(db.db()),
        }
    }

    /// Active menu items for a store, grouped by category in category-name
    /// order, items in name order within each group. Items without a
    /// category land in a trailing unnamed group.
    pub async fn menu_for_store(&self, store_id: &str) -> PosResult<Vec<(String, Vec<MenuItem>)>> {
        let categories = self
            .categories
            .find_all()
            .await
            .map_err(|e| map_repo("load categories", e))?;
        let items = self
            .items
            .find_active_by_store(store_id)
            .await
            .map_err(|e| map_repo("load menu items", e))?;

        let mut groups: Vec<(String, Vec<MenuItem>)> = Vec::new();
        for category in &categories {
            let members: Vec<MenuItem> = items
                .iter()
                .filter(|i| i.category == category.id)
                .cloned()
                .collect();
            if !members.is_empty() {
                groups.push((category.name.clone(), members));
            }
        }
        let uncategorized: Vec<MenuItem> = items
            .iter()
            .filter(|i| i.category.is_none())
            .cloned()
            .collect();
        if !uncategorized.is_empty() {
            groups.push((String::new(), uncategorized));
        }
        Ok(groups)
    }

    /// Active menu items for a store, flat, name order
    pub async fn items_for_store(&self, store_id: &str) -> PosResult<Vec<MenuItem>> {
        self.items
            .find_active_by_store(store_id)
            .await
            .map_err(|e| map_repo("load menu items", e))
    }

    /// Look up one menu item, erroring when missing or inactive
    pub async fn get_item(&self, item_id: &str) -> PosResult<MenuItem> {
        let item = self
            .items
            .find_by_id(item_id)
            .await
            .map_err(|e| map_repo("load menu item", e))?
            .ok_or_else(|| PosError::not_found(format!("menu item {}", item_id)))?;
        if !item.isactive {
            return Err(PosError::not_found(format!("menu item {}", item_id)));
        }
        Ok(item)
    }

    /// All categories, name order
    pub async fn categories(&self) -> PosResult<Vec<Category>> {
        self.categories
            .find_all()
            .await
            .map_err(|e| map_repo("load categories", e))
    }

    /// Active stores, name order
    pub async fn stores(&self) -> PosResult<Vec<Store>> {
        self.stores
            .find_active()
            .await
            .map_err(|e| map_repo("load stores", e))
    }

    /// Dining tables for a store, table-number order
    pub async fn tables_for_store(&self, store_id: &str) -> PosResult<Vec<DiningTable>> {
        self.tables
            .find_by_store(store_id)
            .await
            .map_err(|e| map_repo("load tables", e))
    }

    pub async fn create_item(&self, data: MenuItemCreate) -> PosResult<MenuItem> {
        self.items
            .create(data)
            .await
            .map_err(|e| map_repo("create menu item", e))
    }

    pub async fn create_category(&self, data: CategoryCreate) -> PosResult<Category> {
        self.categories
            .create(data)
            .await
            .map_err(|e| map_repo("create category", e))
    }

    pub async fn create_store(&self, data: StoreCreate) -> PosResult<Store> {
        self.stores
            .create(data)
            .await
            .map_err(|e| map_repo("create store", e))
    }

    pub async fn create_table(&self, data: DiningTableCreate) -> PosResult<DiningTable> {
        self.tables
            .create(data)
            .await
            .map_err(|e| map_repo("create table", e))
    }
}

/// Lift a repository error into the unified taxonomy, tagging store
/// failures with the step that hit them.
pub(crate) fn map_repo(step: &str, err: RepoError) -> PosError {
    match err {
        RepoError::NotFound(what) => PosError::not_found(what),
        RepoError::Conflict(message) => PosError::conflict(message),
        RepoError::Validation(message) => PosError::validation(message),
        RepoError::Database(message) => PosError::Persistence {
            step: step.to_string(),
            message,
        },
    }
}
