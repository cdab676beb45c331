//! Local filter evaluation over formatted cells.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::NaiveDate;
use log::warn;
use regex::Regex;

use super::FilterSet;
use super::TypedFilter;
use super::normalize_date;
use super::plan::resolve_logged;
use crate::model::Cell;
use crate::model::ColumnModel;
use crate::model::Comparable;
use crate::model::Row;
use crate::model::Value;
use crate::model::parse_number;

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid markup pattern"));

/// Removes markup tags from formatted text.
pub fn strip_markup(text: &str) -> String {
    MARKUP_TAG.replace_all(text, "").into_owned()
}

/// Text shown for a cell: the hook's formatting if any, without markup.
fn display_text(cell: &Cell) -> String {
    let formatted = cell
        .column()
        .column_hooks()
        .and_then(|hooks| hooks.format_cell(cell))
        .unwrap_or_else(|| cell.text());
    strip_markup(&formatted)
}

fn compare_pair(cell: &Cell, keyword: &str) -> (Comparable, Comparable) {
    cell.column()
        .column_hooks()
        .and_then(|hooks| hooks.compare_value(cell, keyword))
        .unwrap_or_else(|| {
            (
                Comparable::from_value(&cell.content),
                Comparable::from_keyword(keyword),
            )
        })
}

fn cell_date(content: &Value) -> Option<NaiveDate> {
    match content {
        Value::Date(d) => Some(*d),
        Value::DateTime(dt) => Some(dt.date_naive()),
        Value::String(s) => normalize_date(s).ok(),
        _ => None,
    }
}

fn contains_text(cell: &Cell, needle: &str) -> bool {
    needle.is_empty()
        || cell.text().to_lowercase().contains(needle)
        || display_text(cell).to_lowercase().contains(needle)
}

/// Returns `true` if one cell satisfies the filter.
pub fn matches(filter: &TypedFilter, cell: &Cell) -> bool {
    match filter {
        TypedFilter::Contains(needle) => contains_text(cell, &needle.to_lowercase()),
        TypedFilter::GreaterThan(keyword) => {
            let (value, keyword) = compare_pair(cell, keyword);
            value > keyword
        }
        TypedFilter::LessThan(keyword) => {
            let (value, keyword) = compare_pair(cell, keyword);
            value < keyword
        }
        TypedFilter::Equals(n) => cell.content.parse_number() == Some(*n),
        TypedFilter::NotEquals(n) => cell.content.parse_number().is_some_and(|v| v != *n),
        TypedFilter::Range(lo, hi) => {
            let (value, lo) = compare_pair(cell, lo);
            let (_, hi) = compare_pair(cell, hi);
            value >= lo && value <= hi
        }
        TypedFilter::ContainsNumber(keyword) => {
            let numeric = match (cell.content.parse_number(), parse_number(keyword)) {
                (Some(value), Some(n)) => value == n,
                _ => false,
            };
            numeric || contains_text(cell, &keyword.to_lowercase())
        }
        TypedFilter::In(tokens) => {
            let text = cell.text();
            let text = text.trim();
            tokens.iter().any(|t| t.to_lowercase() == text.to_lowercase())
        }
        TypedFilter::OnDate(date) => cell_date(&cell.content) == Some(*date),
    }
}

/// Evaluates a filter over the cells of one column.
///
/// Returns the `row_index` of every matching cell, in input order.
pub fn evaluate<'a>(filter: &TypedFilter, cells: impl IntoIterator<Item = &'a Cell>) -> Vec<usize> {
    cells
        .into_iter()
        .filter(|cell| matches(filter, cell))
        .map(|cell| cell.row_index)
        .collect()
}

/// Applies every filter of the set to the rows, intersecting the matches.
///
/// Returns the positions of the rows to show, ascending. Unknown columns are
/// skipped; a rejected keyword matches nothing.
pub fn rows_to_show(filters: &FilterSet, rows: &[Row], columns: &ColumnModel) -> Vec<usize> {
    let mut shown: BTreeSet<usize> = (0..rows.len()).collect();

    for (col_index, keyword) in filters.iter() {
        let Some(column) = columns.get(col_index) else {
            warn!("skipping filter on unknown column {}", col_index);
            continue;
        };
        let filter = match resolve_logged(column, keyword) {
            Ok(Some(filter)) => filter,
            Ok(None) => continue,
            Err(()) => return Vec::new(),
        };

        let cells = rows.iter().enumerate().filter_map(|(position, row)| {
            row.cell(col_index).filter(|c| c.row_index == position)
        });
        let matched: BTreeSet<usize> = evaluate(&filter, cells).into_iter().collect();
        shown = shown.intersection(&matched).copied().collect();
    }

    shown.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::Column;
    use crate::model::ColumnHooks;
    use crate::model::FieldType;

    fn cells(values: Vec<Value>) -> Vec<Cell> {
        cells_for(Column::new("v", "V"), values)
    }

    fn cells_for(column: Column, values: Vec<Value>) -> Vec<Cell> {
        let column = Arc::new(column);
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| Cell::new(v, i, column.clone()))
            .collect()
    }

    #[test]
    fn test_greater_than_numeric() {
        let cells = cells(vec![3.into(), 10.into(), "7".into(), "abc".into()]);
        assert_eq!(evaluate(&TypedFilter::GreaterThan("5".into()), &cells), vec![1, 2, 3]);
    }

    #[test]
    fn test_less_than_mixed_falls_back_to_text() {
        let cells = cells(vec!["apple".into(), "pear".into(), 2.into()]);
        assert_eq!(evaluate(&TypedFilter::LessThan("banana".into()), &cells), vec![0, 2]);
    }

    #[test]
    fn test_equals_is_strict_numeric() {
        let cells = cells(vec![5.into(), "5".into(), "five".into(), Value::Null, 6.into()]);
        assert_eq!(evaluate(&TypedFilter::Equals(5.0), &cells), vec![0, 1]);
        assert_eq!(evaluate(&TypedFilter::NotEquals(5.0), &cells), vec![4]);
    }

    #[test]
    fn test_range_inclusive() {
        let cells = cells(vec![10.into(), 15.into(), 20.into(), 21.into()]);
        let filter = TypedFilter::Range("10".into(), "20".into());
        assert_eq!(evaluate(&filter, &cells), vec![0, 1, 2]);
    }

    #[test]
    fn test_inferred_range_keyword() {
        let filter = crate::filter::infer("10:20").unwrap();
        assert_eq!(filter, TypedFilter::Range("10".into(), "20".into()));

        let cells = cells(vec![5.into(), 10.into(), 15.into(), 20.into(), 25.into()]);
        assert_eq!(evaluate(&filter, &cells), vec![1, 2, 3]);
    }

    #[test]
    fn test_contains_empty_needle_matches_all() {
        let cells = cells(vec!["a".into(), Value::Null]);
        assert_eq!(evaluate(&TypedFilter::Contains(String::new()), &cells), vec![0, 1]);
    }

    #[test]
    fn test_contains_case_insensitive() {
        let cells = cells(vec!["Hello".into(), "world".into()]);
        assert_eq!(evaluate(&TypedFilter::Contains("HEL".into()), &cells), vec![0]);
    }

    #[test]
    fn test_contains_number_equality_or_substring() {
        let cells = cells(vec![5.into(), 15.into(), 5.5.into(), "x".into()]);
        assert_eq!(
            evaluate(&TypedFilter::ContainsNumber("5".into()), &cells),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_in_set_membership() {
        let cells = cells(vec!["Open".into(), " closed ".into(), "Draft".into()]);
        let filter = TypedFilter::In(vec!["open".into(), "CLOSED".into()]);
        assert_eq!(evaluate(&filter, &cells), vec![0, 1]);
    }

    #[test]
    fn test_on_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let cells = cells(vec![date.into(), "05-03-2024".into(), "2024-03-06".into()]);
        assert_eq!(evaluate(&TypedFilter::OnDate(date), &cells), vec![0, 1]);
    }

    struct Badge;

    impl ColumnHooks for Badge {
        fn format_cell(&self, cell: &Cell) -> Option<String> {
            Some(format!("<span class=\"badge\">{}</span>", cell.text()))
        }

        fn compare_value(&self, cell: &Cell, keyword: &str) -> Option<(Comparable, Comparable)> {
            Some((
                Comparable::Number(cell.text().len() as f64),
                Comparable::from_keyword(keyword),
            ))
        }
    }

    #[test]
    fn test_contains_ignores_markup() {
        let cells = cells_for(Column::new("v", "V").hooks(Badge), vec!["Open".into()]);
        assert!(evaluate(&TypedFilter::Contains("span".into()), &cells).is_empty());
        assert_eq!(evaluate(&TypedFilter::Contains("open".into()), &cells), vec![0]);
    }

    #[test]
    fn test_hook_compare_value() {
        let cells = cells_for(Column::new("v", "V").hooks(Badge), vec!["ab".into(), "abcd".into()]);
        assert_eq!(evaluate(&TypedFilter::GreaterThan("3".into()), &cells), vec![1]);
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<b>bold</b> text"), "bold text");
    }

    fn grid_rows(columns: &ColumnModel, data: &[(&str, i64)]) -> Vec<Row> {
        data.iter()
            .enumerate()
            .map(|(i, (name, amount))| {
                Row::new(
                    vec![
                        Cell::new((*name).into(), i, columns.get(0).unwrap().clone()),
                        Cell::new((*amount).into(), i, columns.get(1).unwrap().clone()),
                    ],
                    Default::default(),
                )
            })
            .collect()
    }

    #[test]
    fn test_rows_to_show_intersects() {
        let columns = ColumnModel::new([Column::new("name", "Name"), Column::new("amount", "Amount")]);
        let rows = grid_rows(&columns, &[("Alpha", 10), ("Beta", -5), ("Alps", 1)]);

        let mut filters = FilterSet::new();
        filters.set(0, "al");
        filters.set(1, ">5");

        assert_eq!(rows_to_show(&filters, &rows, &columns), vec![0]);
    }

    #[test]
    fn test_rows_to_show_without_filters_keeps_all() {
        let columns = ColumnModel::new([Column::new("name", "Name"), Column::new("amount", "Amount")]);
        let rows = grid_rows(&columns, &[("Alpha", 10), ("Beta", -5), ("Alps", 1)]);

        assert_eq!(rows_to_show(&FilterSet::new(), &rows, &columns), vec![0, 1, 2]);
    }

    #[test]
    fn test_rows_to_show_twice_changes_nothing() {
        let columns = ColumnModel::new([Column::new("name", "Name"), Column::new("amount", "Amount")]);
        let data = [("Alpha", 10), ("Beta", -5), ("Alps", 1), ("Gamma", 7)];
        let rows = grid_rows(&columns, &data);

        let mut filters = FilterSet::new();
        filters.set(1, ">0");
        let first = rows_to_show(&filters, &rows, &columns);

        let kept: Vec<_> = first.iter().map(|&i| data[i]).collect();
        let again = rows_to_show(&filters, &grid_rows(&columns, &kept), &columns);

        assert_eq!(first, vec![0, 2, 3]);
        assert_eq!(again, (0..kept.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_rows_to_show_skips_unknown_column() {
        let columns = ColumnModel::new([Column::new("name", "Name"), Column::new("amount", "Amount")]);
        let rows = grid_rows(&columns, &[("Alpha", 10), ("Beta", -5)]);

        let mut filters = FilterSet::new();
        filters.set(9, "x");

        assert_eq!(rows_to_show(&filters, &rows, &columns), vec![0, 1]);
    }

    #[test]
    fn test_rows_to_show_rejected_keyword_matches_nothing() {
        let columns = ColumnModel::new([
            Column::new("name", "Name"),
            Column::new("amount", "Amount").field_type(FieldType::Percent),
        ]);
        let rows = grid_rows(&columns, &[("Alpha", 10)]);

        let mut filters = FilterSet::new();
        filters.set(1, "lots");

        assert!(rows_to_show(&filters, &rows, &columns).is_empty());
    }
}
