//! Shared types for the POS order lifecycle core
//!
//! Domain types, the error taxonomy and small utilities used across the
//! workspace (and by any future binary/UI crate).

pub mod error;
pub mod order;
pub mod util;

// Re-exports
pub use error::{PosError, PosResult};
pub use order::{CustomerInfo, OrderLine, OrderStatus, OrderType, PaymentMethod, SessionContext};
pub use serde::{Deserialize, Serialize};
