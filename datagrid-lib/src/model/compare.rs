//! Comparable values for filter and query comparisons.

use std::cmp::Ordering;

use super::Value;
use super::value::parse_number;

/// A value reduced to the form used by comparator filters.
///
/// Two comparables compare numerically only when both are numbers; any other
/// pairing compares their lower-cased text.
#[derive(Debug, Clone)]
pub enum Comparable {
    /// A finite number.
    Number(f64),
    /// Lower-cased text.
    Text(String),
}

impl Comparable {
    /// Reduces a cell or field value.
    pub fn from_value(value: &Value) -> Self {
        match value.parse_number() {
            Some(n) => Comparable::Number(n),
            None => Comparable::Text(value.to_text().to_lowercase()),
        }
    }

    /// Reduces a filter keyword.
    pub fn from_keyword(keyword: &str) -> Self {
        match parse_number(keyword) {
            Some(n) => Comparable::Number(n),
            None => Comparable::Text(keyword.trim().to_lowercase()),
        }
    }

    /// Returns the text form used for mixed comparisons.
    pub fn text(&self) -> String {
        match self {
            Comparable::Number(n) => n.to_string(),
            Comparable::Text(s) => s.clone(),
        }
    }
}

impl PartialEq for Comparable {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Comparable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            _ => Some(self.text().cmp(&other.text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_compare_numerically() {
        assert!(Comparable::from_value(&Value::from("10")) > Comparable::from_keyword("9"));
    }

    #[test]
    fn test_mixed_compare_as_text() {
        // "10" < "9" lexically once either side is text
        assert!(Comparable::from_value(&Value::from("abc")) > Comparable::from_keyword("9"));
        assert!(Comparable::Text("10".into()) < Comparable::Number(9.0));
    }

    #[test]
    fn test_equality_agrees_with_ordering() {
        assert_eq!(Comparable::Number(10.0), Comparable::Text("10".into()));
        assert_ne!(Comparable::Number(10.0), Comparable::Text("10.5".into()));
        assert_eq!(Comparable::Number(2.0), Comparable::Number(2.0));
    }

    #[test]
    fn test_keyword_text_is_lowercased() {
        assert_eq!(Comparable::from_keyword(" Beta "), Comparable::Text("beta".into()));
    }
}
