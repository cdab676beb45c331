//! Remote query conditions.

use std::fmt;

use super::TypedFilter;
use super::format_date;
use super::infer;
use super::infer::split_tokens;
use super::normalize_date;
use super::plan::parse_percent;
use crate::error::FilterError;
use crate::model::Column;
use crate::model::Comparable;
use crate::model::FieldType;
use crate::model::Record;
use crate::model::Value;
use crate::model::parse_number;

/// Comparison operator of a remote condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Pattern match with `%` wildcards, case-insensitive.
    Like,
    Eq,
    Ne,
    Gt,
    Lt,
    /// Inclusive range.
    Between,
    /// Set membership.
    In,
}

impl Operator {
    /// Returns the wire spelling of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Like => "like",
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Between => "between",
            Operator::In => "in",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    Pair(Value, Value),
    List(Vec<String>),
}

/// A `(entity, field, operator, value)` condition sent to a data source.
///
/// # Example
///
/// ```
/// use datagrid_lib::filter::{Condition, Operator};
///
/// let condition = Condition::like("invoice", "customer", "%acme%");
/// assert_eq!(condition.operator, Operator::Like);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub entity: String,
    pub field: String,
    pub operator: Operator,
    pub operand: Operand,
}

impl Condition {
    fn new(entity: impl Into<String>, field: impl Into<String>, operator: Operator, operand: Operand) -> Self {
        Self {
            entity: entity.into(),
            field: field.into(),
            operator,
            operand,
        }
    }

    /// Creates a pattern condition: `field like pattern`.
    pub fn like(entity: impl Into<String>, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(entity, field, Operator::Like, Operand::Value(Value::String(pattern.into())))
    }

    /// Creates an equality condition: `field = value`.
    pub fn eq(entity: impl Into<String>, field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(entity, field, Operator::Eq, Operand::Value(value.into()))
    }

    /// Creates a not-equal condition: `field != value`.
    pub fn ne(entity: impl Into<String>, field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(entity, field, Operator::Ne, Operand::Value(value.into()))
    }

    /// Creates a greater-than condition: `field > value`.
    pub fn gt(entity: impl Into<String>, field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(entity, field, Operator::Gt, Operand::Value(value.into()))
    }

    /// Creates a less-than condition: `field < value`.
    pub fn lt(entity: impl Into<String>, field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(entity, field, Operator::Lt, Operand::Value(value.into()))
    }

    /// Creates a range condition: `field between lo and hi`.
    pub fn between(
        entity: impl Into<String>,
        field: impl Into<String>,
        lo: impl Into<Value>,
        hi: impl Into<Value>,
    ) -> Self {
        Self::new(entity, field, Operator::Between, Operand::Pair(lo.into(), hi.into()))
    }

    /// Creates a membership condition: `field in (values)`.
    pub fn is_in(
        entity: impl Into<String>,
        field: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(entity, field, Operator::In, Operand::List(values))
    }

    /// Looks up the field in a record of `entity`.
    ///
    /// Conditions on another entity read the `entity:field` key first.
    fn lookup<'a>(&self, record: &'a Record, entity: &str) -> Option<&'a Value> {
        if self.entity != entity {
            let related = format!("{}:{}", self.entity, self.field);
            if let Some(value) = record.get_present(&related) {
                return Some(value);
            }
        }
        record.get_present(&self.field)
    }

    /// Returns `true` if a record of `entity` satisfies this condition.
    ///
    /// Missing and null fields only satisfy a `like` whose pattern matches
    /// the empty string.
    pub fn matches(&self, record: &Record, entity: &str) -> bool {
        let Some(value) = self.lookup(record, entity) else {
            return match (&self.operator, &self.operand) {
                (Operator::Like, Operand::Value(pattern)) => like_match("", &pattern.to_text()),
                _ => false,
            };
        };

        match (&self.operator, &self.operand) {
            (Operator::Like, Operand::Value(pattern)) => {
                like_match(&value.to_text().to_lowercase(), &pattern.to_text().to_lowercase())
            }
            (Operator::Eq, Operand::Value(expected)) => values_equal(value, expected),
            (Operator::Ne, Operand::Value(expected)) => !values_equal(value, expected),
            (Operator::Gt, Operand::Value(bound)) => {
                Comparable::from_value(value) > Comparable::from_value(bound)
            }
            (Operator::Lt, Operand::Value(bound)) => {
                Comparable::from_value(value) < Comparable::from_value(bound)
            }
            (Operator::Between, Operand::Pair(lo, hi)) => {
                let value = Comparable::from_value(value);
                value >= Comparable::from_value(lo) && value <= Comparable::from_value(hi)
            }
            (Operator::In, Operand::List(values)) => {
                let text = value.to_text().trim().to_lowercase();
                values.iter().any(|v| v.to_lowercase() == text)
            }
            _ => false,
        }
    }
}

fn values_equal(value: &Value, expected: &Value) -> bool {
    match (value.parse_number(), expected.parse_number()) {
        (Some(a), Some(b)) => a == b,
        _ => value.to_text().to_lowercase() == expected.to_text().to_lowercase(),
    }
}

/// Matches SQL-style `%` wildcards.
fn like_match(text: &str, pattern: &str) -> bool {
    let parts: Vec<&str> = pattern.split('%').collect();
    let [first, middle @ .., last] = parts.as_slice() else {
        return text == pattern;
    };

    if text.len() < first.len() + last.len() || !text.starts_with(first) || !text.ends_with(last) {
        return false;
    }

    let mut rest = &text[first.len()..text.len() - last.len()];
    for part in middle {
        match rest.find(part) {
            Some(at) => rest = &rest[at + part.len()..],
            None => return false,
        }
    }
    true
}

fn keyword_value(keyword: &str) -> Value {
    match parse_number(keyword) {
        Some(n) => Value::Float(n),
        None => Value::String(keyword.to_string()),
    }
}

/// Builds the remote condition for a keyword typed into a column.
///
/// Returns `Ok(None)` for an empty keyword and `Err` when the column rejects
/// the keyword, in which case no condition should be sent.
///
/// | Column | Condition |
/// |--------|-----------|
/// | currency | `like "kw%"` |
/// | percent | `= number` |
/// | related `entity:field` | `like "%kw%"` on the related entity |
/// | keyword with `;` | `in [tokens]` |
/// | date | `= "YYYY-MM-DD"` |
/// | select, link | `like "%kw%"` |
/// | other | inferred comparator, else `like "%kw%"` |
pub fn to_condition(column: &Column, keyword: &str, entity: &str) -> Result<Option<Condition>, FilterError> {
    if keyword.is_empty() {
        return Ok(None);
    }
    let trimmed = keyword.trim();
    let field = column.field();

    if let Some((child_entity, child_field)) = column.related() {
        return Ok(Some(Condition::like(child_entity, child_field, format!("%{trimmed}%"))));
    }

    let condition = match column.field_type {
        FieldType::Currency => Condition::like(entity, field, format!("{trimmed}%")),
        FieldType::Percent => {
            let n = parse_percent(keyword).ok_or_else(|| FilterError::invalid_number(&column.id, keyword))?;
            Condition::eq(entity, field, n)
        }
        _ if keyword.contains(';') => Condition::is_in(entity, field, split_tokens(keyword)),
        FieldType::Date => Condition::eq(entity, field, format_date(normalize_date(keyword)?)),
        FieldType::Select | FieldType::Link => Condition::like(entity, field, format!("%{trimmed}%")),
        _ => match infer(keyword) {
            Some(TypedFilter::GreaterThan(v)) => Condition::gt(entity, field, keyword_value(&v)),
            Some(TypedFilter::LessThan(v)) => Condition::lt(entity, field, keyword_value(&v)),
            Some(TypedFilter::Equals(n)) => Condition::eq(entity, field, n),
            Some(TypedFilter::NotEquals(n)) => Condition::ne(entity, field, n),
            Some(TypedFilter::Range(lo, hi)) => {
                Condition::between(entity, field, keyword_value(&lo), keyword_value(&hi))
            }
            _ => Condition::like(entity, field, format!("%{trimmed}%")),
        },
    };
    Ok(Some(condition))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condition(column: Column, keyword: &str) -> Condition {
        to_condition(&column, keyword, "invoice").unwrap().unwrap()
    }

    #[test]
    fn test_currency_prefix_like() {
        let c = condition(Column::new("amount", "Amount").field_type(FieldType::Currency), "12");
        assert_eq!(c, Condition::like("invoice", "amount", "12%"));
    }

    #[test]
    fn test_percent_equals_number() {
        let column = Column::new("rate", "Rate").field_type(FieldType::Percent);
        assert_eq!(condition(column.clone(), "7.5"), Condition::eq("invoice", "rate", 7.5));
        assert!(to_condition(&column, "abc", "invoice").is_err());
    }

    #[test]
    fn test_related_routes_to_child_entity() {
        let c = condition(Column::new("customer:city", "City"), "Oslo");
        assert_eq!(c, Condition::like("customer", "city", "%Oslo%"));
    }

    #[test]
    fn test_semicolon_in_list() {
        let c = condition(Column::new("status", "Status").field_type(FieldType::Select), "a; b");
        assert_eq!(c, Condition::is_in("invoice", "status", ["a", "b"]));
    }

    #[test]
    fn test_date_normalized() {
        let column = Column::new("due", "Due").field_type(FieldType::Date);
        assert_eq!(condition(column.clone(), "05-03-2024"), Condition::eq("invoice", "due", "2024-03-05"));
        assert!(to_condition(&column, "soon", "invoice").is_err());
    }

    #[test]
    fn test_generic_comparators() {
        let qty = || Column::new("qty", "Qty");
        assert_eq!(condition(qty(), ">5"), Condition::gt("invoice", "qty", 5.0));
        assert_eq!(condition(qty(), "<abc"), Condition::lt("invoice", "qty", "abc"));
        assert_eq!(condition(qty(), "=3"), Condition::eq("invoice", "qty", 3.0));
        assert_eq!(condition(qty(), "!=3"), Condition::ne("invoice", "qty", 3.0));
        assert_eq!(condition(qty(), "1:9"), Condition::between("invoice", "qty", 1.0, 9.0));
        assert_eq!(condition(qty(), "ab"), Condition::like("invoice", "qty", "%ab%"));
        assert_eq!(condition(qty(), "42"), Condition::like("invoice", "qty", "%42%"));
    }

    #[test]
    fn test_empty_keyword_has_no_condition() {
        assert_eq!(to_condition(&Column::new("qty", "Qty"), "", "invoice").unwrap(), None);
    }

    #[test]
    fn test_like_match() {
        assert!(like_match("acme corp", "%corp"));
        assert!(like_match("acme corp", "acme%"));
        assert!(like_match("acme corp", "%me c%"));
        assert!(like_match("acme", "a%c%e"));
        assert!(!like_match("acme", "%x%"));
        assert!(!like_match("ab", "ab%b"));
        assert!(like_match("", "%%"));
    }

    #[test]
    fn test_matches_record() {
        let record = Record::new()
            .set("qty", 10)
            .set("status", "Open")
            .set("customer:city", "Oslo");

        assert!(Condition::gt("invoice", "qty", 5.0).matches(&record, "invoice"));
        assert!(!Condition::lt("invoice", "qty", 5.0).matches(&record, "invoice"));
        assert!(Condition::between("invoice", "qty", 10, 20).matches(&record, "invoice"));
        assert!(Condition::is_in("invoice", "status", ["open"]).matches(&record, "invoice"));
        assert!(Condition::like("customer", "city", "%os%").matches(&record, "invoice"));
        assert!(!Condition::eq("invoice", "missing", 1).matches(&record, "invoice"));
    }
}
