// lib/src/errors.rs

use models::errors::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Carries the entity name, rendered as "Doctor not found".
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("duplicate key: a {entity} with {field} \"{value}\" already exists")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Another writer changed the document between read and write.
    #[error("{0} was modified concurrently, retry the update")]
    Conflict(&'static str),

    #[error("Database operation failed: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

impl From<sled::Error> for ServiceError {
    fn from(err: sled::Error) -> Self {
        ServiceError::Database(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServiceError::Connection(format!("Async task join error: {}", err))
    }
}
