//! Error types

mod field;
mod filter;
mod source;

pub use field::*;
pub use filter::*;
pub use source::*;

/// Top-level error for grid operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A filter keyword could not be turned into a condition.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// The data source failed to answer a query.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// An operation referenced a column index with no matching column.
    #[error("No column at index {0}")]
    UnknownColumn(usize),

    /// A structural change was attempted while the grid is frozen.
    #[error("Grid is frozen by another structural operation")]
    Frozen,
}

impl Error {
    /// Returns `true` if retrying the same operation later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Source(e) => e.is_retryable(),
            Self::Frozen => true,
            _ => false,
        }
    }
}
