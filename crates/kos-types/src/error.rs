use thiserror::Error;

use crate::index::MAX_INDEXES;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid type name: {0}")]
    InvalidType(String),

    #[error("a maximum of {max} indexes can be specified, got {actual}", max = MAX_INDEXES)]
    IndexOverflow { actual: usize },

    #[error("unknown index slot: {0}")]
    UnknownSlot(String),
}
