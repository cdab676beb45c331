//! Column-aware filter resolution.

use log::warn;

use super::TypedFilter;
use super::infer;
use super::infer::split_tokens;
use super::normalize_date;
use crate::error::FilterError;
use crate::model::Column;
use crate::model::FieldType;
use crate::model::parse_number;

/// Parses a percent keyword, accepting a trailing `%`.
pub(crate) fn parse_percent(keyword: &str) -> Option<f64> {
    let trimmed = keyword.trim();
    parse_number(trimmed.strip_suffix('%').unwrap_or(trimmed))
}

/// Resolves the filter a keyword applies to a column.
///
/// Returns `Ok(None)` for an empty keyword. Rules, in order:
///
/// 1. Related columns always match by substring.
/// 2. Percent columns require a number and match it exactly.
/// 3. A keyword containing `;` matches any of its tokens.
/// 4. Date columns match a normalized calendar date.
/// 5. Anything else goes through [`infer`](super::infer).
pub fn resolve(column: &Column, keyword: &str) -> Result<Option<TypedFilter>, FilterError> {
    if keyword.is_empty() {
        return Ok(None);
    }

    if column.related().is_some() {
        return Ok(Some(TypedFilter::Contains(keyword.trim().to_lowercase())));
    }

    match column.field_type {
        FieldType::Percent => parse_percent(keyword)
            .map(|n| Some(TypedFilter::Equals(n)))
            .ok_or_else(|| FilterError::invalid_number(&column.id, keyword)),
        FieldType::Currency => Ok(infer(keyword)),
        _ if keyword.contains(';') => Ok(Some(TypedFilter::In(split_tokens(keyword)))),
        FieldType::Date => normalize_date(keyword).map(|d| Some(TypedFilter::OnDate(d))),
        _ => Ok(infer(keyword)),
    }
}

/// Like [`resolve`], but logs and returns `Err(())` for a rejected keyword.
pub(crate) fn resolve_logged(column: &Column, keyword: &str) -> Result<Option<TypedFilter>, ()> {
    resolve(column, keyword).map_err(|e| warn!("filter on column {} rejected: {}", column.id, e))
}
