//! Dining Table Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Dining table entity
///
/// `is_occupied` is true iff an unreleased pending dine-in order is bound to
/// the table. The lifecycle controller keeps this invariant; the flag is
/// flipped inside the same transaction that creates or completes the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Human-facing table number
    pub table_no: i32,
    /// Seat count
    pub size: i32,
    /// Space/area label ("Terrace", "Main hall")
    #[serde(default)]
    pub label: String,
    pub storeid: Option<RecordId>,
    pub is_occupied: bool,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub table_no: i32,
    pub size: Option<i32>,
    #[serde(default)]
    pub label: String,
    pub storeid: Option<RecordId>,
}
