use kos_query::QueryError;
use kos_types::Identifier;

/// Errors from record backend operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested record was not found.
    #[error("no such record with id: {0}")]
    NotFound(Identifier),

    /// A record with this identifier already exists.
    #[error("record already exists: {0}")]
    AlreadyExists(Identifier),

    /// Attempted to store or look up the unset identifier.
    #[error("cannot use the unset identifier")]
    UnsetIdentifier,

    /// Encoded compact payload exceeds the column limit.
    #[error("compact payload for {id} is {len} bytes encoded, limit is {limit}")]
    CompactOverflow {
        id: Identifier,
        len: usize,
        limit: usize,
    },

    /// Optimistic concurrency check failed.
    #[error("version conflict on {id}: expected {expected}, found {actual}")]
    VersionConflict {
        id: Identifier,
        expected: u64,
        actual: u64,
    },

    /// The stored payload cannot be decoded.
    #[error("corrupt record {id}: {reason}")]
    CorruptRecord { id: Identifier, reason: String },

    /// The search condition could not be parsed.
    #[error(transparent)]
    Condition(#[from] QueryError),

    /// A lock guarding backend state was poisoned.
    #[error("backend lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
