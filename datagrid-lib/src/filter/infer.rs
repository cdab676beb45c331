//! Keyword type inference.

use chrono::NaiveDate;

use crate::model::is_numeric;
use crate::model::parse_number;

/// A filter derived from a free-text keyword.
///
/// Never stored: recomputed every time filters are applied.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedFilter {
    /// Case-insensitive substring; the needle is lower-cased.
    Contains(String),
    /// Greater than the keyword text (coerced at evaluation time).
    GreaterThan(String),
    /// Less than the keyword text (coerced at evaluation time).
    LessThan(String),
    /// Strict numeric equality.
    Equals(f64),
    /// Strict numeric inequality.
    NotEquals(f64),
    /// Inclusive bounds, in the order given.
    Range(String, String),
    /// Numeric equality or substring of the number text.
    ContainsNumber(String),
    /// Set membership over `;`-separated tokens.
    In(Vec<String>),
    /// Same calendar day.
    OnDate(NaiveDate),
}

/// The name of a filter's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Contains,
    GreaterThan,
    LessThan,
    Equals,
    NotEquals,
    Range,
    ContainsNumber,
    In,
    OnDate,
}

impl FilterKind {
    /// Returns the canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Contains => "contains",
            FilterKind::GreaterThan => "greaterThan",
            FilterKind::LessThan => "lessThan",
            FilterKind::Equals => "equals",
            FilterKind::NotEquals => "notEquals",
            FilterKind::Range => "range",
            FilterKind::ContainsNumber => "containsNumber",
            FilterKind::In => "in",
            FilterKind::OnDate => "onDate",
        }
    }
}

impl TypedFilter {
    /// Returns the type of this filter.
    pub fn kind(&self) -> FilterKind {
        match self {
            TypedFilter::Contains(_) => FilterKind::Contains,
            TypedFilter::GreaterThan(_) => FilterKind::GreaterThan,
            TypedFilter::LessThan(_) => FilterKind::LessThan,
            TypedFilter::Equals(_) => FilterKind::Equals,
            TypedFilter::NotEquals(_) => FilterKind::NotEquals,
            TypedFilter::Range(..) => FilterKind::Range,
            TypedFilter::ContainsNumber(_) => FilterKind::ContainsNumber,
            TypedFilter::In(_) => FilterKind::In,
            TypedFilter::OnDate(_) => FilterKind::OnDate,
        }
    }
}

/// Splits `;`-separated tokens, trimming each and dropping empty ones.
pub fn split_tokens(keyword: &str) -> Vec<String> {
    keyword
        .split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Clone, Copy)]
enum Comparator {
    NotEquals,
    Greater,
    Less,
    Equals,
}

fn split_comparator(keyword: &str) -> (Option<Comparator>, &str) {
    // `!=` must be checked before `=`
    if let Some(rest) = keyword.strip_prefix("!=") {
        (Some(Comparator::NotEquals), rest)
    } else if let Some(rest) = keyword.strip_prefix('>') {
        (Some(Comparator::Greater), rest)
    } else if let Some(rest) = keyword.strip_prefix('<') {
        (Some(Comparator::Less), rest)
    } else if let Some(rest) = keyword.strip_prefix('=') {
        (Some(Comparator::Equals), rest)
    } else {
        (None, keyword)
    }
}

fn parse_range(keyword: &str) -> Option<(String, String)> {
    let (lo, hi) = keyword.split_once(':')?;
    if hi.contains(':') || !is_numeric(lo) || !is_numeric(hi) {
        return None;
    }
    Some((lo.trim().to_string(), hi.trim().to_string()))
}

/// Infers a typed filter from a raw keyword.
///
/// Returns `None` for an empty keyword. Rules apply in order; the first
/// match wins:
///
/// | Keyword | Filter |
/// |---------|--------|
/// | `!=5` | `NotEquals(5.0)` |
/// | `>5`, `<abc` | `GreaterThan("5")`, `LessThan("abc")` |
/// | `=5` | `Equals(5.0)` |
/// | `5` | `ContainsNumber("5")` |
/// | `10:20` | `Range("10", "20")` |
/// | anything else | `Contains(lower-cased)` |
///
/// # Example
///
/// ```
/// use datagrid_lib::filter::{infer, TypedFilter};
///
/// assert_eq!(infer(">5"), Some(TypedFilter::GreaterThan("5".into())));
/// assert_eq!(infer("!=5"), Some(TypedFilter::NotEquals(5.0)));
/// assert_eq!(infer(""), None);
/// ```
pub fn infer(keyword: &str) -> Option<TypedFilter> {
    if keyword.is_empty() {
        return None;
    }

    let (comparator, rest) = split_comparator(keyword);
    let trimmed = rest.trim();

    match comparator {
        Some(Comparator::NotEquals) => {
            if let Some(n) = parse_number(trimmed) {
                return Some(TypedFilter::NotEquals(n));
            }
        }
        Some(Comparator::Greater) if !trimmed.is_empty() => {
            return Some(TypedFilter::GreaterThan(trimmed.to_string()));
        }
        Some(Comparator::Less) if !trimmed.is_empty() => {
            return Some(TypedFilter::LessThan(trimmed.to_string()));
        }
        Some(Comparator::Equals) => {
            if let Some(n) = parse_number(trimmed) {
                return Some(TypedFilter::Equals(n));
            }
        }
        _ => {}
    }

    if is_numeric(trimmed) {
        return Some(TypedFilter::ContainsNumber(trimmed.to_string()));
    }

    if let Some((lo, hi)) = parse_range(keyword) {
        return Some(TypedFilter::Range(lo, hi));
    }

    Some(TypedFilter::Contains(trimmed.to_lowercase()))
}
