//! Catalog Models
//!
//! Menu items, categories and stores. Read-only from the order's
//! perspective; the create payloads exist for menu/store management.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    /// Unit price, >= 0
    pub price: f64,
    pub category: Option<RecordId>,
    pub storeid: Option<RecordId>,
    pub isactive: bool,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub price: f64,
    pub category: Option<RecordId>,
    pub storeid: Option<RecordId>,
}

/// Menu category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
}

/// Store entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub isactive: bool,
}

/// Create store payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCreate {
    pub name: String,
    #[serde(default)]
    pub address: String,
}
