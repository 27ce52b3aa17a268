//! Order Models
//!
//! Persisted order header, line rows, the table-binding join row and the
//! hydration read model.

use serde::{Deserialize, Serialize};
use shared::{CustomerInfo, OrderStatus, OrderType};
use surrealdb::RecordId;

/// Persisted order header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub order_type: OrderType,
    pub status: OrderStatus,
    /// Assigned once at first persistence, never regenerated
    pub receipt_no: i64,
    pub subtotal: f64,
    pub tax: f64,
    pub total_amount: f64,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_address: String,
    #[serde(default)]
    pub customer_mobile: String,
    pub storeid: Option<RecordId>,
    pub userid: Option<RecordId>,
    /// Optimistic concurrency counter, starts at 1
    pub version: i64,
    /// Epoch milliseconds
    pub created_at: i64,
    pub updated_at: i64,
    pub completed_at: Option<i64>,
}

/// Persisted order line (relation `order_item`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub orderid: RecordId,
    pub itemid: RecordId,
    /// Denormalized name snapshot
    pub name: String,
    /// Unit price snapshot at add time
    pub price: f64,
    pub quantity: i32,
    pub total_price: f64,
    /// Insertion order within the order
    pub position: i32,
}

/// Order-to-table join row (relation `order_table`)
///
/// A join relation rather than a foreign key on the order, so multi-table
/// orders stay representable; the lifecycle binds at most one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableBinding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub orderid: RecordId,
    pub tableid: RecordId,
    pub created_at: i64,
}

/// Line row as hydrated by the detail query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineDetail {
    pub itemid: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub position: i32,
}

/// Full order read model: header plus lines in insertion order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub id: RecordId,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub receipt_no: i64,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_address: String,
    #[serde(default)]
    pub customer_mobile: String,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    pub completed_at: Option<i64>,
    #[serde(default)]
    pub order_items: Vec<LineDetail>,
}

impl OrderDetail {
    pub fn customer(&self) -> CustomerInfo {
        CustomerInfo {
            name: self.customer_name.clone(),
            address: self.customer_address.clone(),
            mobile: self.customer_mobile.clone(),
        }
    }
}
