//! Order Lifecycle Controller
//!
//! Owns the pending half of an order's life: opening a table (resuming its
//! pending order when one exists), starting takeaway drafts, and persisting
//! cart state with `place` / `update`. Settlement lives in
//! [`crate::orders::checkout`].

use crate::catalog::map_repo;
use crate::db::DbService;
use crate::db::models::{DiningTable, Order, OrderDetail, OrderLineRow};
use crate::db::repository::{DiningTableRepository, OrderRepository, parse_record_id};
use crate::orders::cart::OrderCart;
use crate::orders::money;
use shared::util::{now_millis, receipt_number};
use shared::{OrderStatus, OrderType, PosError, PosResult, SessionContext};
use surrealdb::RecordId;
use uuid::Uuid;

const ORDER_TABLE: &str = "orders";

/// Result of opening a table: the table record and either the resumed
/// pending cart or a fresh draft.
#[derive(Debug, Clone)]
pub struct TableSession {
    pub table: DiningTable,
    pub cart: OrderCart,
    /// True when an existing pending order was resumed
    pub resumed: bool,
}

#[derive(Clone)]
pub struct OrderLifecycle {
    orders: OrderRepository,
    tables: DiningTableRepository,
}

impl OrderLifecycle {
    pub fn new(db: &DbService) -> Self {
        Self {
            orders: OrderRepository::new(db.db()),
            tables: DiningTableRepository::new(db.db()),
        }
    }

    /// Open a table for order entry. When the table already carries a
    /// pending order the cart resumes it, so a second operator opening the
    /// same table sees the in-flight order rather than a blank draft.
    pub async fn open_table(&self, table_id: &str) -> PosResult<TableSession> {
        let table = self
            .tables
            .get(table_id)
            .await
            .map_err(|e| map_repo("load table", e))?;

        let pending = self
            .orders
            .current_pending_for_table(table_id)
            .await
            .map_err(|e| map_repo("load pending order", e))?;

        let session = match pending {
            Some(detail) => {
                tracing::debug!(table = table_id, order = %detail.id, "resuming pending order");
                TableSession {
                    cart: OrderCart::from_detail(&detail, Some(table_id.to_string())),
                    table,
                    resumed: true,
                }
            }
            None => TableSession {
                cart: OrderCart::new_dine_in(table_id),
                table,
                resumed: false,
            },
        };
        Ok(session)
    }

    /// Fresh takeaway draft; no table involved
    pub fn start_takeaway(&self) -> OrderCart {
        OrderCart::new_takeaway()
    }

    /// Persist a draft cart as a new pending order. Dine-in placement binds
    /// the table and marks it occupied in the same transaction; an occupied
    /// table conflicts. The receipt number is assigned here, once.
    pub async fn place(&self, cart: &mut OrderCart, ctx: &SessionContext) -> PosResult<()> {
        if cart.is_placed() {
            return Err(PosError::conflict(
                "order has already been placed; use update",
            ));
        }
        self.validate_cart(cart)?;

        let table_rid = match (cart.order_type, cart.table_id.as_deref()) {
            (OrderType::DineIn, Some(table_id)) => {
                Some(parse_record_id(table_id, "table").map_err(|e| map_repo("place order", e))?)
            }
            (OrderType::DineIn, None) => {
                return Err(PosError::validation("dine-in order has no table"));
            }
            (OrderType::Takeaway, _) => None,
        };

        let order_rid = RecordId::from_table_key(ORDER_TABLE, Uuid::new_v4().simple().to_string());
        let receipt_no = receipt_number();
        let now = now_millis();

        let sub = money::subtotal(&cart.lines)?;
        let order = Order {
            id: None,
            order_type: cart.order_type,
            status: OrderStatus::Pending,
            receipt_no,
            subtotal: money::to_f64(sub),
            tax: money::to_f64(money::calc_tax(sub)),
            total_amount: money::to_f64(money::calc_total(sub)),
            customer_name: cart.customer.name.clone(),
            customer_address: cart.customer.address.clone(),
            customer_mobile: cart.customer.mobile.clone(),
            storeid: Some(
                parse_record_id(&ctx.store_id, "store").map_err(|e| map_repo("place order", e))?,
            ),
            userid: Some(
                parse_record_id(&ctx.user_id, "user").map_err(|e| map_repo("place order", e))?,
            ),
            version: 1,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };

        let lines = self.build_line_rows(&order_rid, cart)?;
        self.orders
            .create_with_lines(order_rid.clone(), order, lines, table_rid)
            .await
            .map_err(|e| map_repo("place order", e))?;

        cart.id = Some(order_rid.to_string());
        cart.receipt_no = Some(receipt_no);
        cart.status = OrderStatus::Pending;
        cart.version = 1;

        tracing::info!(
            order = %order_rid,
            receipt = receipt_no,
            order_type = cart.order_type.as_str(),
            items = cart.item_count(),
            "order placed"
        );
        Ok(())
    }

    /// Persist edits to an already-placed pending order: the full line set
    /// is replaced and totals recomputed. The version the cart was loaded
    /// from must still be current, otherwise the update conflicts. The
    /// receipt number is never touched.
    pub async fn update(&self, cart: &mut OrderCart) -> PosResult<()> {
        let order_id = cart
            .id
            .as_deref()
            .ok_or_else(|| PosError::validation("order has not been placed yet"))?;
        if cart.status != OrderStatus::Pending {
            return Err(PosError::conflict("only pending orders can be updated"));
        }
        self.validate_cart(cart)?;

        let order_rid =
            parse_record_id(order_id, "order").map_err(|e| map_repo("update order", e))?;
        let sub = money::subtotal(&cart.lines)?;
        let lines = self.build_line_rows(&order_rid, cart)?;

        self.orders
            .replace_lines(
                order_rid.clone(),
                cart.version,
                money::to_f64(sub),
                money::to_f64(money::calc_tax(sub)),
                money::to_f64(money::calc_total(sub)),
                lines,
            )
            .await
            .map_err(|e| map_repo("update order", e))?;

        cart.version += 1;
        tracing::info!(
            order = %order_rid,
            version = cart.version,
            items = cart.item_count(),
            "order updated"
        );
        Ok(())
    }

    /// Force-release a table's occupancy flag. Normally the settlement
    /// transaction does this; the explicit call exists for recovery when a
    /// table is wedged by stale data. Idempotent.
    pub async fn release_table(&self, table_id: &str) -> PosResult<DiningTable> {
        let table = self
            .tables
            .set_occupied(table_id, false)
            .await
            .map_err(|e| map_repo("release table", e))?;
        tracing::info!(table = table_id, "table released");
        Ok(table)
    }

    /// The pending order currently bound to a table, hydrated as a cart
    pub async fn current_pending_for_table(&self, table_id: &str) -> PosResult<Option<OrderCart>> {
        let detail = self
            .orders
            .current_pending_for_table(table_id)
            .await
            .map_err(|e| map_repo("load pending order", e))?;
        Ok(detail.map(|d| OrderCart::from_detail(&d, Some(table_id.to_string()))))
    }

    /// All pending orders, oldest first (kitchen/backlog views)
    pub async fn pending_orders(&self) -> PosResult<Vec<OrderDetail>> {
        self.orders
            .find_pending()
            .await
            .map_err(|e| map_repo("load pending orders", e))
    }

    /// Load one order with its lines, erroring when missing
    pub async fn get_order(&self, order_id: &str) -> PosResult<OrderDetail> {
        self.orders
            .get_detail_required(order_id)
            .await
            .map_err(|e| map_repo("load order", e))
    }

    fn validate_cart(&self, cart: &OrderCart) -> PosResult<()> {
        if cart.is_empty() {
            return Err(PosError::validation("cannot place an order with no items"));
        }
        for line in &cart.lines {
            money::validate_line(line)?;
        }
        Ok(())
    }

    fn build_line_rows(&self, order_rid: &RecordId, cart: &OrderCart) -> PosResult<Vec<OrderLineRow>> {
        let mut rows = Vec::with_capacity(cart.lines.len());
        for (index, line) in cart.lines.iter().enumerate() {
            let itemid =
                parse_record_id(&line.item_id, "item").map_err(|e| map_repo("build lines", e))?;
            rows.push(OrderLineRow {
                id: None,
                orderid: order_rid.clone(),
                itemid,
                name: line.name.clone(),
                price: line.unit_price,
                quantity: line.quantity,
                total_price: money::to_f64(money::line_total(line)?),
                position: index as i32,
            });
        }
        Ok(rows)
    }
}
