//! Checkout Processor
//!
//! Settles a placed pending order: validates the tender, then completes the
//! order, records the payment and releases the table in one transaction.
//! Insufficient payment is rejected before anything is written, so a failed
//! checkout leaves the order pending and untouched.

use crate::catalog::map_repo;
use crate::db::DbService;
use crate::db::models::PaymentRow;
use crate::db::repository::{OrderRepository, PaymentRepository, parse_record_id};
use crate::orders::cart::OrderCart;
use crate::orders::money;
use shared::util::now_millis;
use shared::{CustomerInfo, OrderStatus, OrderType, PaymentMethod, PosError, PosResult};

/// Outcome of a successful settlement
#[derive(Debug, Clone)]
pub struct Settlement {
    pub order_id: String,
    pub receipt_no: i64,
    pub total: f64,
    pub amount_paid: f64,
    pub change_due: f64,
    pub payment_method: PaymentMethod,
    /// Epoch milliseconds
    pub paid_at: i64,
}

#[derive(Clone)]
pub struct CheckoutProcessor {
    orders: OrderRepository,
    payments: PaymentRepository,
}

impl CheckoutProcessor {
    pub fn new(db: &DbService) -> Self {
        Self {
            orders: OrderRepository::new(db.db()),
            payments: PaymentRepository::new(db.db()),
        }
    }

    /// Settle a placed pending order. Exactly-once: a second settlement of
    /// the same order conflicts on the pending guard inside the transaction.
    pub async fn settle(
        &self,
        cart: &mut OrderCart,
        method: PaymentMethod,
        amount_paid: f64,
        customer: CustomerInfo,
    ) -> PosResult<Settlement> {
        let order_id = cart
            .id
            .as_deref()
            .ok_or_else(|| PosError::validation("order has not been placed yet"))?
            .to_string();
        if cart.status != OrderStatus::Pending {
            return Err(PosError::conflict("order is already settled"));
        }
        if cart.is_empty() {
            return Err(PosError::validation("cannot settle an order with no items"));
        }

        money::require_finite(amount_paid, "amount paid")?;
        if amount_paid < 0.0 {
            return Err(PosError::validation(format!(
                "amount paid must not be negative, got {}",
                amount_paid
            )));
        }

        let sub = money::subtotal(&cart.lines)?;
        let total = money::calc_total(sub);
        let paid = money::to_decimal(amount_paid, "amount paid")?;
        if paid < total {
            return Err(PosError::InsufficientPayment {
                paid: money::to_f64(paid),
                total: money::to_f64(total),
            });
        }
        let change = money::calc_change(paid, total);

        let order_rid =
            parse_record_id(&order_id, "order").map_err(|e| map_repo("settle order", e))?;
        let table_rid = match (cart.order_type, cart.table_id.as_deref()) {
            (OrderType::DineIn, Some(table_id)) => Some(
                parse_record_id(table_id, "table").map_err(|e| map_repo("settle order", e))?,
            ),
            _ => None,
        };

        let paid_at = now_millis();
        let payment = PaymentRow {
            id: None,
            orderid: order_rid.clone(),
            payment_method: method,
            amount_paid: money::to_f64(paid),
            change_due: money::to_f64(change),
            paid_at,
        };

        self.orders
            .complete(
                order_rid.clone(),
                customer.name.clone(),
                customer.address.clone(),
                customer.mobile.clone(),
                payment,
                table_rid,
            )
            .await
            .map_err(|e| map_repo("settle order", e))?;

        cart.status = OrderStatus::Completed;
        cart.customer = customer;
        cart.version += 1;

        let settlement = Settlement {
            order_id: order_id.clone(),
            receipt_no: cart.receipt_no.unwrap_or(0),
            total: money::to_f64(total),
            amount_paid: money::to_f64(paid),
            change_due: money::to_f64(change),
            payment_method: method,
            paid_at,
        };

        tracing::info!(
            order = %order_id,
            receipt = settlement.receipt_no,
            method = method.as_str(),
            total = settlement.total,
            change = settlement.change_due,
            "order settled"
        );
        Ok(settlement)
    }

    /// Payments recorded for one order
    pub async fn payments_for_order(&self, order_id: &str) -> PosResult<Vec<PaymentRow>> {
        self.payments
            .list_by_order(order_id)
            .await
            .map_err(|e| map_repo("load payments", e))
    }
}
