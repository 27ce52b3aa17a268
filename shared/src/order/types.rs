//! Shared order types
//!
//! Canonical enums and value types for the order lifecycle. String forms are
//! the canonical wire/storage values; no legacy spellings (`dine in`,
//! `take out`) are ever produced or accepted.

use serde::{Deserialize, Serialize};

/// Order service type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    /// Bound to a physical table, table marked occupied until checkout
    #[default]
    DineIn,
    /// No table binding
    Takeaway,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DineIn => "dine-in",
            Self::Takeaway => "takeaway",
        }
    }
}

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created but not yet paid
    #[default]
    Pending,
    /// Paid and finalized
    Completed,
    /// Abandoned; representable but no lifecycle transition produces it
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Payment method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Upi => "upi",
        }
    }
}

/// One item + quantity entry within an order
///
/// `unit_price` is a snapshot of the catalog price at add time; catalog price
/// changes after the line is added never move an open order's totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// Catalog item id ("item:xyz")
    pub item_id: String,
    /// Denormalized item name snapshot
    pub name: String,
    /// Unit price snapshot at add time
    pub unit_price: f64,
    /// Quantity, always >= 1 (a line at 0 is removed, not stored)
    pub quantity: i32,
}

/// Optional customer details captured at checkout
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CustomerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub mobile: String,
}

impl CustomerInfo {
    /// True when no detail was captured (walk-in guest)
    pub fn is_guest(&self) -> bool {
        self.name.is_empty() && self.address.is_empty() && self.mobile.is_empty()
    }
}

/// Explicit per-call operator context
///
/// The store and user performing an operation are passed in here rather than
/// read from ambient state, so the controller never depends on a globally
/// selected store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    /// Store record id ("store:xyz")
    pub store_id: String,
    /// User record id ("user:xyz")
    pub user_id: String,
}

impl SessionContext {
    pub fn new(store_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            user_id: user_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_type_canonical_strings() {
        assert_eq!(OrderType::DineIn.as_str(), "dine-in");
        assert_eq!(OrderType::Takeaway.as_str(), "takeaway");
    }

    #[test]
    fn order_type_serde_round_trip() {
        let json = serde_json::to_string(&OrderType::DineIn).unwrap();
        assert_eq!(json, "\"dine-in\"");
        let back: OrderType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OrderType::DineIn);
    }

    #[test]
    fn guest_detection() {
        assert!(CustomerInfo::default().is_guest());
        let named = CustomerInfo {
            name: "Ada".to_string(),
            ..Default::default()
        };
        assert!(!named.is_guest());
    }
}
