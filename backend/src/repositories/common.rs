//! Shared repository utilities.

use thiserror::Error;

/// Failure surfaced by any repository implementation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record already exists: {0}")]
    Duplicate(String),
    #[error("database error")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Duplicate(db.message().to_string())
            }
            _ => RepositoryError::Database(err),
        }
    }
}
