//! Database record models
//!
//! Serde structs mapping 1:1 onto the persisted relations. Record ids are
//! `Option<RecordId>` (absent until created); references to other records
//! are stored as record links.

pub mod catalog;
pub mod dining_table;
pub mod order;
pub mod payment;

pub use catalog::{Category, CategoryCreate, MenuItem, MenuItemCreate, Store, StoreCreate};
pub use dining_table::{DiningTable, DiningTableCreate};
pub use order::{LineDetail, Order, OrderDetail, OrderLineRow, TableBinding};
pub use payment::PaymentRow;
