//! Order Repository
//!
//! All multi-row order writes run as single server-side transactions so a
//! crash mid-write can never leave a header without lines, a payment without
//! a completed order, or an occupied table without a pending order. Guard
//! failures inside a transaction are raised with THROW and surface here as
//! `RepoError::Conflict` via message classification.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Order, OrderDetail, OrderLineRow, PaymentRow};
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

/// Header plus correlated lines in insertion order.
const DETAIL_PROJECTION: &str =
    "*, (SELECT * FROM order_item WHERE orderid = $parent.id ORDER BY position) AS order_items";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order: header, lines and (for dine-in) the table
    /// binding plus occupancy flip, atomically. The occupancy guard runs
    /// inside the transaction so two concurrent placements on the same
    /// table cannot both succeed.
    pub async fn create_with_lines(
        &self,
        order_id: RecordId,
        order: Order,
        lines: Vec<OrderLineRow>,
        table_id: Option<RecordId>,
    ) -> RepoResult<()> {
        let query = match table_id {
            Some(_) => {
                "BEGIN TRANSACTION;
                 LET $free = SELECT * FROM $table_id WHERE is_occupied = false;
                 IF array::len($free) = 0 { THROW 'table occupied' };
                 CREATE $order_id CONTENT $order;
                 INSERT INTO order_item $lines;
                 INSERT INTO order_table {
                     orderid: $order_id,
                     tableid: $table_id,
                     created_at: $now
                 };
                 UPDATE $table_id SET is_occupied = true;
                 COMMIT TRANSACTION;"
            }
            None => {
                "BEGIN TRANSACTION;
                 CREATE $order_id CONTENT $order;
                 INSERT INTO order_item $lines;
                 COMMIT TRANSACTION;"
            }
        };

        self.base
            .db()
            .query(query)
            .bind(("order_id", order_id))
            .bind(("order", order))
            .bind(("lines", lines))
            .bind(("now", now_millis()))
            .bind(("table_id", table_id))
            .await?
            .check()?;
        Ok(())
    }

    /// Replace the full line set and recomputed totals of a pending order.
    /// Guarded by the optimistic version counter; a stale caller gets a
    /// conflict instead of clobbering a newer revision.
    pub async fn replace_lines(
        &self,
        order_id: RecordId,
        expected_version: i64,
        subtotal: f64,
        tax: f64,
        total_amount: f64,
        lines: Vec<OrderLineRow>,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "BEGIN TRANSACTION;
                 LET $updated = UPDATE $order_id SET
                     subtotal = $subtotal,
                     tax = $tax,
                     total_amount = $total,
                     updated_at = $now,
                     version = version + 1
                     WHERE version = $version AND status = 'pending'
                     RETURN AFTER;
                 IF array::len($updated) = 0 { THROW 'order version conflict' };
                 DELETE order_item WHERE orderid = $order_id;
                 INSERT INTO order_item $lines;
                 COMMIT TRANSACTION;",
            )
            .bind(("order_id", order_id))
            .bind(("subtotal", subtotal))
            .bind(("tax", tax))
            .bind(("total", total_amount))
            .bind(("now", now_millis()))
            .bind(("version", expected_version))
            .bind(("lines", lines))
            .await?
            .check()?;
        Ok(())
    }

    /// Settle a pending order: flip it to completed, record the payment and
    /// (for dine-in) release the table, atomically. The pending guard makes
    /// settlement exactly-once; a second attempt conflicts.
    pub async fn complete(
        &self,
        order_id: RecordId,
        customer_name: String,
        customer_address: String,
        customer_mobile: String,
        payment: PaymentRow,
        table_id: Option<RecordId>,
    ) -> RepoResult<()> {
        let query = match table_id {
            Some(_) => {
                "BEGIN TRANSACTION;
                 LET $done = UPDATE $order_id SET
                     status = 'completed',
                     customer_name = $cust_name,
                     customer_address = $cust_address,
                     customer_mobile = $cust_mobile,
                     completed_at = $now,
                     updated_at = $now,
                     version = version + 1
                     WHERE status = 'pending'
                     RETURN AFTER;
                 IF array::len($done) = 0 { THROW 'order not pending' };
                 INSERT INTO payment $payment;
                 UPDATE $table_id SET is_occupied = false;
                 COMMIT TRANSACTION;"
            }
            None => {
                "BEGIN TRANSACTION;
                 LET $done = UPDATE $order_id SET
                     status = 'completed',
                     customer_name = $cust_name,
                     customer_address = $cust_address,
                     customer_mobile = $cust_mobile,
                     completed_at = $now,
                     updated_at = $now,
                     version = version + 1
                     WHERE status = 'pending'
                     RETURN AFTER;
                 IF array::len($done) = 0 { THROW 'order not pending' };
                 INSERT INTO payment $payment;
                 COMMIT TRANSACTION;"
            }
        };

        self.base
            .db()
            .query(query)
            .bind(("order_id", order_id))
            .bind(("cust_name", customer_name))
            .bind(("cust_address", customer_address))
            .bind(("cust_mobile", customer_mobile))
            .bind(("now", now_millis()))
            .bind(("payment", payment))
            .bind(("table_id", table_id))
            .await?
            .check()?;
        Ok(())
    }

    /// Hydrate one order with its lines in insertion order
    pub async fn get_detail(&self, order_id: &str) -> RepoResult<Option<OrderDetail>> {
        let rid = parse_record_id(order_id, "order")?;
        let detail: Option<OrderDetail> = self
            .base
            .db()
            .query(format!(
                "SELECT {} FROM orders WHERE id = $order_id",
                DETAIL_PROJECTION
            ))
            .bind(("order_id", rid))
            .await?
            .take(0)?;
        Ok(detail)
    }

    /// Hydrate one order, erroring when missing
    pub async fn get_detail_required(&self, order_id: &str) -> RepoResult<OrderDetail> {
        self.get_detail(order_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("order {}", order_id)))
    }

    /// The pending order bound to a table, if any. When stale data has left
    /// more than one, the latest by `created_at` wins (highest id breaks
    /// ties); the sort runs here rather than in the query because ORDER BY
    /// with LIMIT misbehaves on the embedded engine.
    pub async fn current_pending_for_table(
        &self,
        table_id: &str,
    ) -> RepoResult<Option<OrderDetail>> {
        let rid = parse_record_id(table_id, "table")?;
        let mut candidates: Vec<OrderDetail> = self
            .base
            .db()
            .query(format!(
                "SELECT {} FROM orders WHERE status = 'pending' \
                 AND id IN (SELECT VALUE orderid FROM order_table WHERE tableid = $table_id)",
                DETAIL_PROJECTION
            ))
            .bind(("table_id", rid))
            .await?
            .take(0)?;

        if candidates.len() > 1 {
            tracing::warn!(
                table = table_id,
                count = candidates.len(),
                "multiple pending orders bound to one table, picking latest"
            );
        }
        candidates.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.to_string().cmp(&a.id.to_string()))
        });
        Ok(candidates.into_iter().next())
    }

    /// All pending orders, oldest first (kitchen/backlog views)
    pub async fn find_pending(&self) -> RepoResult<Vec<OrderDetail>> {
        let mut orders: Vec<OrderDetail> = self
            .base
            .db()
            .query(format!(
                "SELECT {} FROM orders WHERE status = 'pending'",
                DETAIL_PROJECTION
            ))
            .await?
            .take(0)?;
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }
}
