//! Typed record field errors

/// Raised when a record field is read as a specific type.
///
/// The formatter treats a `Missing` tree key as "use the default" and logs a
/// `TypeMismatch`; neither aborts a row.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    /// The record carries no such key.
    #[error("Record has no field '{field}'")]
    Missing { field: String },

    /// The value under the key has another type.
    #[error("Field '{field}' holds {actual}, expected {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl FieldError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing { field: field.into() }
    }

    pub fn type_mismatch(field: impl Into<String>, expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }
}
