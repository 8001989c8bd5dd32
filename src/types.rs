use actix::MailboxError;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct PoolInitializationError(pub String);

/// Failures of a store round-trip. Every variant ends up as a generic internal error at the
/// HTTP boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to establish connection: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Store actor unavailable: {0}")]
    Mailbox(#[from] MailboxError),

    #[error("Store table for {0} is corrupted")]
    Corrupted(&'static str),
}

pub type StoreResult<T> = Result<T, StoreError>;
