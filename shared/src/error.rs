//! Unified error taxonomy for the POS core
//!
//! Five categories cover every failure the lifecycle can produce:
//! - [`PosError::Validation`]: bad input, rejected before any store call
//! - [`PosError::Conflict`]: table double-binding, stale version, repeated checkout
//! - [`PosError::NotFound`]: missing table/order/item/store
//! - [`PosError::Persistence`]: an underlying store call failed; carries the
//!   step that failed so the caller can decide retry vs. abort
//! - [`PosError::InsufficientPayment`]: amount paid below the order total

use thiserror::Error;

/// Unified error type for the POS core
#[derive(Debug, Error)]
pub enum PosError {
    /// Invalid input (empty cart, negative quantity, non-finite price)
    #[error("{message}")]
    Validation { message: String },

    /// State conflict (occupied table, stale version, order already settled)
    #[error("{message}")]
    Conflict { message: String },

    /// Resource not found
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Underlying data store call failed
    #[error("persistence failure during {step}: {message}")]
    Persistence { step: String, message: String },

    /// Amount paid is below the order total
    #[error("amount paid {paid:.2} is below order total {total:.2}")]
    InsufficientPayment { paid: f64, total: f64 },
}

impl PosError {
    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a Persistence error naming the step that failed
    pub fn persistence(step: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Persistence {
            step: step.into(),
            message: err.to_string(),
        }
    }

    /// Human-readable message for display to the operator
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Result type for POS operations
pub type PosResult<T> = Result<T, PosError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_payment_message_carries_amounts() {
        let err = PosError::InsufficientPayment {
            paid: 40.0,
            total: 45.10,
        };
        assert_eq!(err.message(), "amount paid 40.00 is below order total 45.10");
    }

    #[test]
    fn persistence_names_the_failed_step() {
        let err = PosError::persistence("insert order lines", "connection reset");
        assert!(err.message().contains("insert order lines"));
        assert!(err.message().contains("connection reset"));
    }
}
