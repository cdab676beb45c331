//! Data source error types

/// Errors returned by a [`DataSource`](crate::source::DataSource).
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The source answered but reported a failure.
    #[error("Fetch failed: {message}")]
    Fetch {
        /// Description of the failure.
        message: String,
        /// Whether the source considers the failure transient.
        retryable: bool,
    },

    /// The source could not be reached at all.
    #[error("Data source unavailable: {0}")]
    Unavailable(String),

    /// The source returned records that could not be decoded.
    #[error("Response parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SourceError {
    /// Creates a new non-retryable fetch error.
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
            retryable: false,
        }
    }

    /// Creates a new retryable fetch error.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
            retryable: true,
        }
    }

    /// Returns `true` if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch { retryable, .. } => *retryable,
            Self::Unavailable(_) => true,
            Self::Parse(_) => false,
        }
    }
}
