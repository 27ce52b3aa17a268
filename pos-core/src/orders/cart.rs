//! Order Cart
//!
//! Local, mutable working copy of one order. All edits happen here and are
//! persisted in one shot by `OrderLifecycle::place` / `update`; nothing in
//! the cart touches the store. Totals are always derived from the lines,
//! never cached.

use crate::db::models::{MenuItem, OrderDetail};
use crate::orders::money;
use shared::{CustomerInfo, OrderLine, OrderStatus, OrderType, PosError, PosResult};

#[derive(Debug, Clone)]
pub struct OrderCart {
    /// Record id ("orders:xyz") once placed, None while draft
    pub id: Option<String>,
    pub order_type: OrderType,
    pub status: OrderStatus,
    /// Assigned at first placement, never regenerated
    pub receipt_no: Option<i64>,
    /// Version of the persisted revision this cart was loaded from
    pub version: i64,
    /// Bound table ("dining_table:xyz"), dine-in only
    pub table_id: Option<String>,
    pub lines: Vec<OrderLine>,
    pub customer: CustomerInfo,
}

impl OrderCart {
    /// Fresh dine-in draft for a table
    pub fn new_dine_in(table_id: impl Into<String>) -> Self {
        Self {
            id: None,
            order_type: OrderType::DineIn,
            status: OrderStatus::Pending,
            receipt_no: None,
            version: 0,
            table_id: Some(table_id.into()),
            lines: Vec::new(),
            customer: CustomerInfo::default(),
        }
    }

    /// Fresh takeaway draft
    pub fn new_takeaway() -> Self {
        Self {
            id: None,
            order_type: OrderType::Takeaway,
            status: OrderStatus::Pending,
            receipt_no: None,
            version: 0,
            table_id: None,
            lines: Vec::new(),
            customer: CustomerInfo::default(),
        }
    }

    /// Hydrate a cart from a persisted order, lines in insertion order
    pub fn from_detail(detail: &OrderDetail, table_id: Option<String>) -> Self {
        let lines = detail
            .order_items
            .iter()
            .map(|row| OrderLine {
                item_id: row.itemid.to_string(),
                name: row.name.clone(),
                unit_price: row.price,
                quantity: row.quantity,
            })
            .collect();
        Self {
            id: Some(detail.id.to_string()),
            order_type: detail.order_type,
            status: detail.status,
            receipt_no: Some(detail.receipt_no),
            version: detail.version,
            table_id,
            lines,
            customer: detail.customer(),
        }
    }

    pub fn is_placed(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of a catalog item. An existing line for the item has its
    /// quantity incremented; otherwise a new line is appended at the end
    /// with a price snapshot taken now.
    pub fn add_item(&mut self, item: &MenuItem) -> PosResult<()> {
        let item_id = item
            .id
            .as_ref()
            .map(|rid| rid.to_string())
            .ok_or_else(|| PosError::validation("menu item has no id"))?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item_id) {
            if line.quantity >= money::MAX_QUANTITY {
                return Err(PosError::validation(format!(
                    "quantity for {} is already at the maximum of {}",
                    line.name,
                    money::MAX_QUANTITY
                )));
            }
            line.quantity += 1;
            return Ok(());
        }

        let line = OrderLine {
            item_id,
            name: item.name.clone(),
            unit_price: item.price,
            quantity: 1,
        };
        money::validate_line(&line)?;
        self.lines.push(line);
        Ok(())
    }

    /// Set the quantity of an existing line. Zero removes the line; a
    /// negative quantity is rejected.
    pub fn set_quantity(&mut self, item_id: &str, quantity: i32) -> PosResult<()> {
        if quantity < 0 {
            return Err(PosError::validation(format!(
                "quantity must not be negative, got {}",
                quantity
            )));
        }
        if quantity > money::MAX_QUANTITY {
            return Err(PosError::validation(format!(
                "quantity {} exceeds the maximum of {}",
                quantity,
                money::MAX_QUANTITY
            )));
        }

        let index = self
            .lines
            .iter()
            .position(|l| l.item_id == item_id)
            .ok_or_else(|| PosError::not_found(format!("cart line for {}", item_id)))?;

        if quantity == 0 {
            self.lines.remove(index);
        } else {
            self.lines[index].quantity = quantity;
        }
        Ok(())
    }

    /// Remove a line entirely. Removing an absent line is a no-op.
    pub fn remove_item(&mut self, item_id: &str) {
        self.lines.retain(|l| l.item_id != item_id);
    }

    pub fn subtotal(&self) -> PosResult<f64> {
        Ok(money::to_f64(money::subtotal(&self.lines)?))
    }

    pub fn tax(&self) -> PosResult<f64> {
        let sub = money::subtotal(&self.lines)?;
        Ok(money::to_f64(money::calc_tax(sub)))
    }

    pub fn total(&self) -> PosResult<f64> {
        let sub = money::subtotal(&self.lines)?;
        Ok(money::to_f64(money::calc_total(sub)))
    }

    /// Total item count across lines
    pub fn item_count(&self) -> i32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::RecordId;

    fn burger() -> MenuItem {
        MenuItem {
            id: Some(RecordId::from_table_key("item", "burger")),
            name: "Burger".to_string(),
            price: 12.99,
            category: None,
            storeid: None,
            isactive: true,
        }
    }

    fn fries() -> MenuItem {
        MenuItem {
            id: Some(RecordId::from_table_key("item", "fries")),
            name: "Fries".to_string(),
            price: 4.99,
            category: None,
            storeid: None,
            isactive: true,
        }
    }

    #[test]
    fn adding_the_same_item_increments_quantity() {
        let mut cart = OrderCart::new_takeaway();
        cart.add_item(&burger()).unwrap();
        cart.add_item(&burger()).unwrap();
        cart.add_item(&fries()).unwrap();
        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.lines[0].quantity, 2);
        assert_eq!(cart.lines[1].quantity, 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn totals_are_derived_from_lines() {
        let mut cart = OrderCart::new_takeaway();
        cart.add_item(&burger()).unwrap();
        cart.add_item(&burger()).unwrap();
        cart.add_item(&fries()).unwrap();
        assert_eq!(cart.subtotal().unwrap(), 30.97);
        assert_eq!(cart.tax().unwrap(), 3.10);
        assert_eq!(cart.total().unwrap(), 34.07);
    }

    #[test]
    fn zero_quantity_removes_the_line() {
        let mut cart = OrderCart::new_takeaway();
        cart.add_item(&burger()).unwrap();
        cart.add_item(&fries()).unwrap();
        cart.set_quantity("item:burger", 0).unwrap();
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].name, "Fries");
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let mut cart = OrderCart::new_takeaway();
        cart.add_item(&burger()).unwrap();
        let err = cart.set_quantity("item:burger", -1).unwrap_err();
        assert!(matches!(err, PosError::Validation { .. }));
        assert_eq!(cart.lines[0].quantity, 1);
    }

    #[test]
    fn setting_quantity_on_absent_line_is_not_found() {
        let mut cart = OrderCart::new_takeaway();
        let err = cart.set_quantity("item:ghost", 2).unwrap_err();
        assert!(matches!(err, PosError::NotFound { .. }));
    }

    #[test]
    fn price_snapshot_survives_catalog_changes() {
        let mut cart = OrderCart::new_takeaway();
        let mut item = burger();
        cart.add_item(&item).unwrap();
        item.price = 99.99;
        assert_eq!(cart.lines[0].unit_price, 12.99);
    }

    #[test]
    fn dine_in_draft_carries_the_table() {
        let cart = OrderCart::new_dine_in("dining_table:t5");
        assert_eq!(cart.order_type, OrderType::DineIn);
        assert_eq!(cart.table_id.as_deref(), Some("dining_table:t5"));
        assert!(!cart.is_placed());
        assert!(cart.is_empty());
    }
}
