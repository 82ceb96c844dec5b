use thiserror::Error;

/// Errors from predicate construction and rendering.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The predicate is empty, malformed, or has a negative bound.
    #[error("invalid predicate: {0}")]
    InvalidPredicate(String),

    /// A rendered condition fragment could not be parsed.
    #[error("malformed condition `{fragment}`: {reason}")]
    MalformedCondition { fragment: String, reason: String },
}

/// Result alias for query operations.
pub type QueryResult<T> = Result<T, QueryError>;
