//! Type-aware stable row sorting.

use std::cmp::Ordering;

use crate::model::Row;
use crate::model::SortOrder;
use crate::model::Value;

/// Orders two cell contents.
///
/// Values rank by class first: `Null`, then anything that parses as a
/// number, then text. Numbers compare numerically and text by display
/// string, so the order is total over mixed columns.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (class(a), class(b)) {
        (Class::Number(x), Class::Number(y)) => x.total_cmp(&y),
        (Class::Text, Class::Text) => a.to_text().cmp(&b.to_text()),
        (x, y) => x.rank().cmp(&y.rank()),
    }
}

enum Class {
    Null,
    Number(f64),
    Text,
}

impl Class {
    fn rank(&self) -> u8 {
        match self {
            Class::Null => 0,
            Class::Number(_) => 1,
            Class::Text => 2,
        }
    }
}

fn class(value: &Value) -> Class {
    if value.is_null() {
        return Class::Null;
    }
    match value.parse_number() {
        Some(n) => Class::Number(n),
        None => Class::Text,
    }
}

/// Sorts rows by the content of one column and re-positions them.
///
/// The sort is stable; `Desc` reverses the comparator so ties keep their
/// prior order. `SortOrder::None` returns the rows unchanged.
pub fn sort(mut rows: Vec<Row>, col_index: usize, order: SortOrder) -> Vec<Row> {
    if !order.is_sorted() {
        return rows;
    }

    let null = Value::Null;
    rows.sort_by(|a, b| {
        let x = a.content(col_index).unwrap_or(&null);
        let y = b.content(col_index).unwrap_or(&null);
        match order {
            SortOrder::Desc => compare_values(y, x),
            _ => compare_values(x, y),
        }
    });

    rows.into_iter()
        .enumerate()
        .map(|(position, row)| row.at_position(position))
        .collect()
}
