//! Error handling types and utilities.

/// A specialized Result type for index and I/O operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Error returned by query operations.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The caller passed an argument the query cannot run with.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// The underlying index failed.
    #[error("index error: {0:#}")]
    Index(#[from] anyhow::Error),
}

impl QueryError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

pub type QueryResult<T> = std::result::Result<T, QueryError>;
