//! Repository Module
//!
//! Per-relation data access over the embedded store. Every call returns
//! `RepoResult`; a non-ok result from the store is never silently ignored.

pub mod category;
pub mod dining_table;
pub mod item;
pub mod order;
pub mod payment;
pub mod store;

// Re-exports
pub use category::CategoryRepository;
pub use dining_table::DiningTableRepository;
pub use item::ItemRepository;
pub use order::OrderRepository;
pub use payment::PaymentRepository;
pub use store::StoreRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        classify(err.to_string())
    }
}

/// The store only exposes stringly errors for aborted transactions, so
/// THROWn guard failures are classified by message here.
fn classify(message: String) -> RepoError {
    let lower = message.to_lowercase();
    if lower.contains("version conflict")
        || lower.contains("not pending")
        || lower.contains("occupied")
    {
        RepoError::Conflict(message)
    } else {
        RepoError::Database(message)
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse a "table:id" string into a RecordId, as a validation error when
/// malformed.
pub fn parse_record_id(id: &str, what: &str) -> RepoResult<surrealdb::RecordId> {
    id.parse()
        .map_err(|_| RepoError::Validation(format!("Invalid {} ID: {}", what, id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_failures_classify_as_conflict() {
        assert!(matches!(
            classify("An error occurred: order version conflict".to_string()),
            RepoError::Conflict(_)
        ));
        assert!(matches!(
            classify("An error occurred: order not pending".to_string()),
            RepoError::Conflict(_)
        ));
        assert!(matches!(
            classify("An error occurred: table occupied".to_string()),
            RepoError::Conflict(_)
        ));
        assert!(matches!(
            classify("io error: disk full".to_string()),
            RepoError::Database(_)
        ));
    }

    #[test]
    fn record_id_parsing() {
        assert!(parse_record_id("dining_table:t1", "table").is_ok());
        assert!(parse_record_id("not a record id", "table").is_err());
    }
}
