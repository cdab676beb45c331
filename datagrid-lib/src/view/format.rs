//! Record to row formatting.

use std::fmt;
use std::sync::Arc;

use log::warn;

use crate::error::FieldError;
use crate::model::CHECKBOX_COLUMN;
use crate::model::Cell;
use crate::model::Column;
use crate::model::ColumnModel;
use crate::model::META_FIELD;
use crate::model::ROW_INDEX_COLUMN;
use crate::model::Record;
use crate::model::Row;
use crate::model::RowMeta;
use crate::model::Value;

/// Content of the synthetic checkbox column.
pub const CHECKBOX_MARKUP: &str = "<input type=\"checkbox\">";

/// Record keys carrying tree metadata.
pub const INDENT_KEY: &str = "_indent";
pub const IS_LEAF_KEY: &str = "_is_leaf";
pub const TREE_NODE_CLOSE_KEY: &str = "_is_tree_node_close";

/// Renders the content of the `meta` summary column.
pub trait MetaRenderer: Send + Sync {
    fn render_meta(&self, record: &Record) -> Value;
}

/// Turns raw records into rows of visible cells.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::{Column, ColumnModel, Record, Value};
/// use datagrid_lib::view::RowFormatter;
///
/// let columns = ColumnModel::new([Column::row_index(), Column::new("name", "Name")]);
/// let records = vec![Record::new().set("name", "A")];
///
/// let rows = RowFormatter::new().format(&records, &columns);
/// assert_eq!(rows[0].content(0), Some(&Value::Int(1)));
/// assert_eq!(rows[0].content(1), Some(&Value::from("A")));
/// ```
#[derive(Clone, Default)]
pub struct RowFormatter {
    meta: Option<Arc<dyn MetaRenderer>>,
}

impl RowFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the renderer of the `meta` column.
    pub fn with_meta_renderer(mut self, renderer: impl MetaRenderer + 'static) -> Self {
        self.meta = Some(Arc::new(renderer));
        self
    }

    /// Formats records in order; the position of each record is its row index.
    pub fn format(&self, records: &[Record], columns: &ColumnModel) -> Vec<Row> {
        records
            .iter()
            .enumerate()
            .map(|(position, record)| self.format_record(record, position, columns))
            .collect()
    }

    /// Formats one record at a position.
    pub fn format_record(&self, record: &Record, position: usize, columns: &ColumnModel) -> Row {
        let cells = columns
            .visible()
            .map(|column| Cell::new(self.content(record, column, position), position, column.clone()))
            .collect();
        Row::new(cells, row_meta(record, position))
    }

    fn content(&self, record: &Record, column: &Column, position: usize) -> Value {
        if column.id == CHECKBOX_COLUMN {
            return Value::Markup(CHECKBOX_MARKUP.to_string());
        }
        if column.id == ROW_INDEX_COLUMN {
            return Value::from(position + 1);
        }
        if column.field() == META_FIELD {
            return self
                .meta
                .as_ref()
                .map(|renderer| renderer.render_meta(record))
                .unwrap_or_default();
        }
        if let Some((_, field)) = column.related() {
            return record
                .get_present(&column.id)
                .or_else(|| record.get_present(field))
                .cloned()
                .unwrap_or_default();
        }
        record.get(column.field()).cloned().unwrap_or_default()
    }
}

impl fmt::Debug for RowFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowFormatter")
            .field("meta", &self.meta.is_some())
            .finish()
    }
}

fn row_meta(record: &Record, position: usize) -> RowMeta {
    let defaults = RowMeta::default();
    RowMeta {
        row_index: position,
        indent: meta_field(record.get_int(INDENT_KEY))
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(defaults.indent),
        is_leaf: meta_field(record.get_bool(IS_LEAF_KEY)).unwrap_or(defaults.is_leaf),
        is_tree_node_close: meta_field(record.get_bool(TREE_NODE_CLOSE_KEY))
            .unwrap_or(defaults.is_tree_node_close),
    }
}

/// Absent tree keys fall back to defaults; mistyped ones are logged.
fn meta_field<T>(value: Result<Option<T>, FieldError>) -> Option<T> {
    match value {
        Ok(value) => value,
        Err(FieldError::Missing { .. }) => None,
        Err(e) => {
            warn!("ignoring row metadata: {}", e);
            None
        }
    }
}
