//! Repository Module
//!
//! Free-function CRUD over the SQLite pool, one module per table.
//! Uniqueness lives in the schema; unique-index violations surface as
//! [`RepoError::Duplicate`] and are given domain meaning by the engines.

// Identity boundary
pub mod user;

// Marketplace
pub mod listing;
pub mod trade;
pub mod vouch;

// Delivery
pub mod notification;

// Account state
pub mod app_setting;
pub mod subscription;

// Engagement
pub mod listing_view;

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

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err
            && matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
        {
            return RepoError::Duplicate(db.message().to_string());
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
