//! Payment Repository
//!
//! Payments are only ever written inside the settlement transaction in the
//! order repository; this is the read side.

use super::{BaseRepository, RepoResult, parse_record_id};
use crate::db::models::PaymentRow;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct PaymentRepository {
    base: BaseRepository,
}

impl PaymentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All payments recorded for one order. An order settled exactly once
    /// has exactly one.
    pub async fn list_by_order(&self, order_id: &str) -> RepoResult<Vec<PaymentRow>> {
        let rid = parse_record_id(order_id, "order")?;
        let payments: Vec<PaymentRow> = self
            .base
            .db()
            .query("SELECT * FROM payment WHERE orderid = $order_id ORDER BY paid_at")
            .bind(("order_id", rid))
            .await?
            .take(0)?;
        Ok(payments)
    }
}
