use thiserror::Error;

/// Errors surfaced by the store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("unknown ordering field: {0}")]
    InvalidOrdering(String),

    #[error("invalid reference: {0}")]
    InvalidReference(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}
