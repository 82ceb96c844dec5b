use kos_query::QueryError;
use kos_store::StoreError;
use kos_types::{Identifier, IndexSlot, TypeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("type {0} is not registered as compact or blob data")]
    InvalidPayloadType(String),

    #[error("a maximum of six (6) indexes can be specified, got {actual}")]
    IndexOverflow { actual: usize },

    #[error("duplicated declaration of index {slot} on field {field}")]
    DuplicateIndex { slot: IndexSlot, field: String },

    #[error("index {slot} declaration is missing")]
    MissingIndex { slot: IndexSlot },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("no such object with id: {0}")]
    NotFound(Identifier),

    #[error("invalid predicate: {0}")]
    InvalidPredicate(String),

    #[error("classification error: {0}")]
    Classification(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("config error: {0}")]
    Config(String),
}

impl From<TypeError> for SdkError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidKey(reason) => Self::InvalidKey(reason),
            TypeError::InvalidType(reason) => Self::Classification(reason),
            TypeError::IndexOverflow { actual } => Self::IndexOverflow { actual },
            TypeError::UnknownSlot(slot) => {
                Self::InvalidPredicate(format!("unknown index slot {slot}"))
            }
        }
    }
}

impl From<QueryError> for SdkError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::InvalidPredicate(reason) => Self::InvalidPredicate(reason),
            other => Self::InvalidPredicate(other.to_string()),
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
