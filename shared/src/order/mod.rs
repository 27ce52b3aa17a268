//! Order domain types

mod types;

pub use types::{CustomerInfo, OrderLine, OrderStatus, OrderType, PaymentMethod, SessionContext};
