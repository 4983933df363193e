//! Repository Module
//!
//! CRUD operations over the embedded SurrealDB tables.

pub mod cart;
pub mod order;
pub mod product;
pub mod reservation;

// Re-exports
pub use cart::CartRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use reservation::ReservationRepository;

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:key" strings everywhere above this layer
// =============================================================================
//
// Models carry IDs as plain strings. At the query boundary they are parsed
// into `surrealdb::RecordId` for binding, and every SELECT projects
// `type::string(id) AS id` so rows deserialize back into string IDs.

/// Parse a "table:key" string into a [`RecordId`]
pub fn parse_record_id(id: &str) -> RepoResult<RecordId> {
    id.parse::<RecordId>()
        .map_err(|_| RepoError::Validation(format!("Invalid record id: {id}")))
}

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
