//! Date keyword normalization.

use chrono::NaiveDate;

use crate::error::FilterError;

/// Layout of a dash-separated date keyword.
#[derive(Clone, Copy)]
enum DateLayout {
    DayMonthYear,
    YearMonthDay,
}

impl DateLayout {
    fn widths(&self) -> [usize; 3] {
        match self {
            DateLayout::DayMonthYear => [2, 2, 4],
            DateLayout::YearMonthDay => [4, 2, 2],
        }
    }
}

fn split_parts(text: &str, layout: DateLayout) -> Option<[u32; 3]> {
    let parts: Vec<&str> = text.split('-').collect();
    if parts.len() != 3 {
        return None;
    }
    let mut values = [0u32; 3];
    for ((part, width), value) in parts.iter().zip(layout.widths()).zip(values.iter_mut()) {
        if part.len() != width || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *value = part.parse().ok()?;
    }
    Some(values)
}

/// Parses a `DD-MM-YYYY` or `YYYY-MM-DD` keyword into a calendar date.
///
/// Impossible dates such as `31-02-2024` are rejected.
///
/// # Example
///
/// ```
/// use datagrid_lib::filter::normalize_date;
///
/// let date = normalize_date("05-03-2024").unwrap();
/// assert_eq!(date.to_string(), "2024-03-05");
/// assert!(normalize_date("30-02-2024").is_err());
/// ```
pub fn normalize_date(keyword: &str) -> Result<NaiveDate, FilterError> {
    let text = keyword.trim();
    for layout in [DateLayout::DayMonthYear, DateLayout::YearMonthDay] {
        let Some(parts) = split_parts(text, layout) else {
            continue;
        };
        let (year, month, day) = match layout {
            DateLayout::DayMonthYear => (parts[2], parts[1], parts[0]),
            DateLayout::YearMonthDay => (parts[0], parts[1], parts[2]),
        };
        if let Some(date) = NaiveDate::from_ymd_opt(year as i32, month, day) {
            return Ok(date);
        }
    }
    Err(FilterError::invalid_date(keyword))
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
