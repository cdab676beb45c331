//! Filter keyword errors

/// Errors raised while turning a keyword into a filter for a column.
///
/// These never abort a whole filter application: the grid logs them and
/// drops the offending column's condition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    /// The keyword is not a `DD-MM-YYYY` or `YYYY-MM-DD` calendar date.
    #[error("Invalid date '{keyword}'")]
    InvalidDate { keyword: String },

    /// A numeric column received a keyword that does not parse as a number.
    #[error("Invalid number '{keyword}' for column '{column}'")]
    InvalidNumber { column: String, keyword: String },
}

impl FilterError {
    /// Creates a new invalid date error.
    pub fn invalid_date(keyword: impl Into<String>) -> Self {
        Self::InvalidDate {
            keyword: keyword.into(),
        }
    }

    /// Creates a new invalid number error.
    pub fn invalid_number(column: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self::InvalidNumber {
            column: column.into(),
            keyword: keyword.into(),
        }
    }
}
