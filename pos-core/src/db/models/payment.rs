//! Payment Model

use serde::{Deserialize, Serialize};
use shared::PaymentMethod;
use surrealdb::RecordId;

/// Payment record, created exactly once per completed order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub orderid: RecordId,
    pub payment_method: PaymentMethod,
    pub amount_paid: f64,
    /// round(amount_paid - total, 2); never negative once accepted
    pub change_due: f64,
    /// Epoch milliseconds
    pub paid_at: i64,
}
