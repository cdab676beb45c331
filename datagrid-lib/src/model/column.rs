//! Column definitions and per-column hooks

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use super::Cell;
use super::Comparable;
use super::Value;

/// Identity of the synthetic row-number column.
pub const ROW_INDEX_COLUMN: &str = "_rowIndex";
/// Identity of the synthetic selection checkbox column.
pub const CHECKBOX_COLUMN: &str = "_checkbox";
/// Field name of the summary column rendered by a [`MetaRenderer`](crate::view::MetaRenderer).
pub const META_FIELD: &str = "meta";
/// Separator between entity and field in a related-column identity.
pub const RELATION_SEPARATOR: char = ':';

/// The kind of data a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Currency,
    Percent,
    Date,
    Select,
    Link,
    Checkbox,
    /// Computed or meta column with no direct field.
    Computed,
}

/// Sort direction of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    None,
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl SortOrder {
    /// Returns `true` for `Asc` and `Desc`.
    pub fn is_sorted(&self) -> bool {
        !matches!(self, SortOrder::None)
    }

    /// Next order in the header click cycle: none → asc → desc → none.
    pub fn cycle(&self) -> Self {
        match self {
            SortOrder::None => SortOrder::Asc,
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::None,
        }
    }
}

/// The active sort of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub col_index: usize,
    pub order: SortOrder,
}

/// Optional per-column overrides.
///
/// Every method defaults to `None`, meaning "use the default algorithm".
///
/// # Example
///
/// ```
/// use datagrid_lib::model::{ColumnHooks, Value};
///
/// struct CountTotal;
///
/// impl ColumnHooks for CountTotal {
///     fn column_total(&self, values: &[&Value]) -> Option<Value> {
///         Some(Value::from(values.len()))
///     }
/// }
/// ```
pub trait ColumnHooks: Send + Sync {
    /// Returns the `(cell value, keyword)` pair used by comparator filters.
    fn compare_value(&self, _cell: &Cell, _keyword: &str) -> Option<(Comparable, Comparable)> {
        None
    }

    /// Returns the footer total for the given column contents.
    fn column_total(&self, _values: &[&Value]) -> Option<Value> {
        None
    }

    /// Returns the formatted text of a cell, possibly containing markup.
    fn format_cell(&self, _cell: &Cell) -> Option<String> {
        None
    }
}

fn default_visible() -> bool {
    true
}

fn default_width() -> u32 {
    120
}

/// A grid column.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::{Column, FieldType};
///
/// let column = Column::new("amount", "Amount")
///     .field_type(FieldType::Currency)
///     .width(160);
///
/// assert_eq!(column.field(), "amount");
/// ```
#[derive(Clone, Deserialize)]
pub struct Column {
    /// Unique identity, stable for the lifetime of the grid.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Record key; empty means the same as `id`.
    #[serde(default)]
    pub(crate) field: String,
    #[serde(default, rename = "fieldtype")]
    pub field_type: FieldType,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default)]
    pub min_width: Option<u32>,
    #[serde(default = "default_visible")]
    pub resizable: bool,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(skip)]
    pub(crate) col_index: usize,
    #[serde(skip)]
    pub(crate) hooks: Option<Arc<dyn ColumnHooks>>,
}

impl Column {
    /// Creates a visible text column.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field: String::new(),
            field_type: FieldType::Text,
            visible: true,
            width: default_width(),
            min_width: None,
            resizable: true,
            sort_order: SortOrder::None,
            col_index: 0,
            hooks: None,
        }
    }

    /// The synthetic 1-based row number column.
    pub fn row_index() -> Self {
        Self::new(ROW_INDEX_COLUMN, "").field_type(FieldType::Computed).width(40)
    }

    /// The synthetic checkbox column.
    pub fn checkbox() -> Self {
        Self::new(CHECKBOX_COLUMN, "").field_type(FieldType::Checkbox).width(32)
    }

    /// Sets the record key.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Sets the field type.
    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// Sets the width.
    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Sets the minimum width.
    pub fn min_width(mut self, width: u32) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Hides the column.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Prevents resizing.
    pub fn fixed(mut self) -> Self {
        self.resizable = false;
        self
    }

    /// Sets the initial sort order.
    pub fn sorted(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Registers hooks overriding the default algorithms.
    pub fn hooks(mut self, hooks: impl ColumnHooks + 'static) -> Self {
        self.hooks = Some(Arc::new(hooks));
        self
    }

    /// Dense position in the column model.
    pub fn col_index(&self) -> usize {
        self.col_index
    }

    /// Record key read by the formatter.
    pub fn field(&self) -> &str {
        if self.field.is_empty() { &self.id } else { &self.field }
    }

    /// Returns the registered hooks, if any.
    pub fn column_hooks(&self) -> Option<&dyn ColumnHooks> {
        self.hooks.as_deref()
    }

    /// Returns `(entity, field)` when the identity names a related entity field.
    pub fn related(&self) -> Option<(&str, &str)> {
        self.id.split_once(RELATION_SEPARATOR)
    }

    /// Returns `true` for the row number and checkbox columns.
    pub fn is_synthetic(&self) -> bool {
        self.id == ROW_INDEX_COLUMN || self.id == CHECKBOX_COLUMN
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("field", &self.field())
            .field("field_type", &self.field_type)
            .field("visible", &self.visible)
            .field("width", &self.width)
            .field("sort_order", &self.sort_order)
            .field("col_index", &self.col_index)
            .field("hooks", &self.hooks.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_related_identity() {
        let column = Column::new("items:qty", "Qty");
        assert_eq!(column.related(), Some(("items", "qty")));
        assert_eq!(Column::new("qty", "Qty").related(), None);
    }

    #[test]
    fn test_deserialize_column() {
        let json = r#"{"id": "rate", "name": "Rate", "fieldtype": "percent", "sort_order": "desc"}"#;
        let column: Column = serde_json::from_str(json).unwrap();

        assert_eq!(column.field_type, FieldType::Percent);
        assert_eq!(column.sort_order, SortOrder::Desc);
        assert!(column.visible);
        assert_eq!(column.field(), "rate");
    }

    #[test]
    fn test_sort_cycle() {
        assert_eq!(SortOrder::None.cycle(), SortOrder::Asc);
        assert_eq!(SortOrder::Desc.cycle(), SortOrder::None);
    }
}
