//! POS order lifecycle core
//!
//! Order entry, table binding and checkout for a restaurant point of sale,
//! backed by an embedded SurrealDB store.
//!
//! # Architecture
//!
//! ```text
//! UI events → OrderCart mutations (local)
//!                  ↓ place / update
//!           OrderLifecycle ──────────→ order / order_item / order_table rows
//!                  ↓ settle
//!          CheckoutProcessor ────────→ status=completed + payment row,
//!                                       table released (dine-in)
//! ```
//!
//! All multi-step writes run as single database transactions; validation
//! failures are rejected before any store call.

pub mod catalog;
pub mod db;
pub mod orders;

// Re-exports
pub use catalog::CatalogService;
pub use db::DbService;
pub use orders::cart::OrderCart;
pub use orders::checkout::{CheckoutProcessor, Settlement};
pub use orders::lifecycle::{OrderLifecycle, TableSession};

// Re-export shared types for convenience
pub use shared::{CustomerInfo, OrderLine, OrderStatus, OrderType, PaymentMethod, PosError,
    PosResult, SessionContext};
