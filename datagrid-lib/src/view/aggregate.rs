//! Footer totals.

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::model::Cell;
use crate::model::Column;
use crate::model::ColumnModel;
use crate::model::Row;
use crate::model::Value;

/// Grid-wide total override, consulted after the column's own hook.
pub trait TotalHook: Send + Sync {
    fn total(&self, column: &Column, values: &[&Value]) -> Option<Value>;
}

/// Running sum of numeric contents.
#[derive(Debug, Clone, Copy)]
enum Sum {
    Empty,
    Int(i64),
    Decimal(Decimal),
    Float(f64),
}

impl Sum {
    fn add(self, value: &Value) -> Self {
        match (self, value) {
            (Sum::Empty, Value::Int(n)) => Sum::Int(*n),
            (Sum::Empty, Value::Decimal(d)) => Sum::Decimal(*d),
            (Sum::Empty, Value::Float(f)) => Sum::Float(*f),
            (Sum::Int(a), Value::Int(b)) => match a.checked_add(*b) {
                Some(n) => Sum::Int(n),
                None => Sum::Decimal(Decimal::from(a) + Decimal::from(*b)),
            },
            (Sum::Int(a), Value::Decimal(d)) => Sum::Decimal(Decimal::from(a) + *d),
            (Sum::Decimal(a), Value::Int(b)) => Sum::Decimal(a + Decimal::from(*b)),
            (Sum::Decimal(a), Value::Decimal(b)) => Sum::Decimal(a + *b),
            (Sum::Float(a), other) => Sum::Float(a + other.as_f64().unwrap_or(0.0)),
            (sum, Value::Float(f)) => Sum::Float(sum.as_f64() + *f),
            (sum, _) => sum,
        }
    }

    fn as_f64(&self) -> f64 {
        match self {
            Sum::Empty => 0.0,
            Sum::Int(n) => *n as f64,
            Sum::Decimal(d) => d.to_f64().unwrap_or(0.0),
            Sum::Float(f) => *f,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Sum::Empty => Value::Null,
            Sum::Int(n) => Value::Int(n),
            Sum::Decimal(d) => Value::Decimal(d),
            Sum::Float(f) => Value::Float(f),
        }
    }
}

/// Sums numeric contents; `Null` if none is numeric.
///
/// Integers and decimals add exactly; any float turns the sum into a float.
pub fn sum_values(values: &[&Value]) -> Value {
    values
        .iter()
        .filter(|v| v.is_number())
        .fold(Sum::Empty, |sum, v| sum.add(v))
        .into_value()
}

/// Computes the total row of a grid.
#[derive(Clone, Default)]
pub struct Aggregator {
    hook: Option<Arc<dyn TotalHook>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a grid-wide total hook.
    pub fn with_hook(mut self, hook: impl TotalHook + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Builds the total row over the visible columns of `rows`.
    ///
    /// Total rows in the input are ignored.
    pub fn compute_totals(&self, rows: &[Row], columns: &ColumnModel) -> Row {
        let cells = columns
            .visible()
            .map(|column| {
                let values: Vec<&Value> = rows
                    .iter()
                    .filter(|row| !row.is_total_row)
                    .filter_map(|row| row.content(column.col_index()))
                    .collect();
                Cell::total(self.total(column, &values), column.clone())
            })
            .collect();
        Row::total(cells)
    }

    fn total(&self, column: &Column, values: &[&Value]) -> Value {
        if column.is_synthetic() {
            return Value::String(String::new());
        }

        let from_column = column
            .column_hooks()
            .and_then(|hooks| hooks.column_total(values))
            .filter(|v| !v.is_null());
        if let Some(total) = from_column {
            return total;
        }

        let from_grid = self
            .hook
            .as_ref()
            .and_then(|hook| hook.total(column, values))
            .filter(|v| !v.is_null());
        if let Some(total) = from_grid {
            return total;
        }

        sum_values(values)
    }
}

impl fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregator")
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::model::ColumnHooks;
    use crate::model::Record;
    use crate::view::RowFormatter;

    #[test]
    fn test_sum_ignores_non_numeric() {
        let values = [Value::from(3), Value::from("x"), Value::from(5), Value::Null];
        let refs: Vec<&Value> = values.iter().collect();
        assert_eq!(sum_values(&refs), Value::Int(8));
    }

    #[test]
    fn test_sum_promotion() {
        let d = Decimal::from_str("1.25").unwrap();
        let exact = [Value::from(1), Value::Decimal(d)];
        assert_eq!(
            sum_values(&exact.iter().collect::<Vec<_>>()),
            Value::Decimal(Decimal::from_str("2.25").unwrap())
        );

        let mixed = [Value::from(1), Value::from(0.5)];
        assert_eq!(sum_values(&mixed.iter().collect::<Vec<_>>()), Value::Float(1.5));
    }

    #[test]
    fn test_sum_without_numbers_is_null() {
        let values = [Value::from("a"), Value::Null];
        assert_eq!(sum_values(&values.iter().collect::<Vec<_>>()), Value::Null);
        assert_eq!(sum_values(&[]), Value::Null);
    }

    struct Count;

    impl ColumnHooks for Count {
        fn column_total(&self, values: &[&Value]) -> Option<Value> {
            Some(Value::from(values.len()))
        }
    }

    struct Fallback;

    impl TotalHook for Fallback {
        fn total(&self, column: &Column, _values: &[&Value]) -> Option<Value> {
            (column.id == "name").then(|| Value::from("n/a"))
        }
    }

    #[test]
    fn test_total_row() {
        let columns = ColumnModel::new([
            Column::row_index(),
            Column::new("name", "Name"),
            Column::new("qty", "Qty"),
            Column::new("lines", "Lines").hooks(Count),
        ]);
        let records = vec![
            Record::new().set("name", "A").set("qty", 2).set("lines", "x"),
            Record::new().set("name", "B").set("qty", 3).set("lines", "y"),
        ];
        let rows = RowFormatter::new().format(&records, &columns);

        let plain = Aggregator::new().compute_totals(&rows, &columns);
        assert!(plain.is_total_row);
        assert_eq!(plain.content(0), Some(&Value::String(String::new())));
        assert_eq!(plain.content(1), Some(&Value::Null));
        assert_eq!(plain.content(2), Some(&Value::Int(5)));
        assert_eq!(plain.content(3), Some(&Value::Int(2)));

        let hooked = Aggregator::new().with_hook(Fallback).compute_totals(&rows, &columns);
        assert_eq!(hooked.content(1), Some(&Value::from("n/a")));
        assert_eq!(hooked.content(2), Some(&Value::Int(5)));
    }
}
