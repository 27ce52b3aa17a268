//! Orders Module
//!
//! The order lifecycle: local cart editing, placement/update through the
//! lifecycle controller, and settlement through the checkout processor.

pub mod cart;
pub mod checkout;
pub mod lifecycle;
pub mod money;

pub use cart::OrderCart;
pub use checkout::{CheckoutProcessor, Settlement};
pub use lifecycle::{OrderLifecycle, TableSession};
