use thiserror::Error;

use crate::database::store::{Kind, StoreError};

/// Failures of authorization and relationship operations, independent of HTTP
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    InvalidAttribute(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Cargo item {cargo_id} is already loaded on vessel {carrier_id}")]
    AlreadyCarried { cargo_id: u64, carrier_id: u64 },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(StoreError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn invalid_attribute(message: impl Into<String>) -> Self {
        DomainError::InvalidAttribute(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::NotFound(message.into())
    }

    pub fn entity_not_found(kind: Kind, id: u64) -> Self {
        DomainError::NotFound(format!("No {} with id {} exists", kind.noun(), id))
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, id } => DomainError::entity_not_found(kind, id),
            other => DomainError::Store(other),
        }
    }
}
