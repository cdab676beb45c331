//! Formatted rows and cells

use std::collections::BTreeMap;
use std::sync::Arc;

use super::Column;
use super::Value;

/// One formatted `(row, column)` pair.
#[derive(Debug, Clone)]
pub struct Cell {
    /// Display-ready content.
    pub content: Value,
    pub row_index: usize,
    pub col_index: usize,
    /// Renderer addressing hints (`class`, `data-row-index`, ...).
    pub attributes: BTreeMap<String, String>,
    /// Hints for the inner content element (`class`, `title`).
    pub content_attributes: BTreeMap<String, String>,
    pub is_total_row: bool,
    column: Arc<Column>,
}

impl Cell {
    /// Creates a body cell stamped with positional attributes.
    pub fn new(content: Value, row_index: usize, column: Arc<Column>) -> Self {
        let col_index = column.col_index();
        let mut cell = Self {
            content,
            row_index,
            col_index,
            attributes: BTreeMap::new(),
            content_attributes: BTreeMap::new(),
            is_total_row: false,
            column,
        };
        cell.stamp();
        cell
    }

    /// Creates a footer cell.
    pub fn total(content: Value, column: Arc<Column>) -> Self {
        let col_index = column.col_index();
        let mut content_attributes = BTreeMap::new();
        content_attributes.insert(
            "class".to_string(),
            format!("dt-cell__content dt-cell__content--col-{col_index}"),
        );
        let mut attributes = BTreeMap::new();
        attributes.insert("class".to_string(), format!("dt-cell dt-cell--col-{col_index}"));
        attributes.insert("data-col-index".to_string(), col_index.to_string());
        Self {
            content,
            row_index: 0,
            col_index,
            attributes,
            content_attributes,
            is_total_row: true,
            column,
        }
    }

    /// The column this cell belongs to.
    pub fn column(&self) -> &Column {
        &self.column
    }

    /// Display text of the content.
    pub fn text(&self) -> String {
        self.content.to_text()
    }

    fn stamp(&mut self) {
        let (row, col) = (self.row_index, self.col_index);
        self.attributes = BTreeMap::from([
            (
                "class".to_string(),
                format!("dt-cell dt-cell--col-{col} dt-cell--{col}-{row} dt-cell--row-{row}"),
            ),
            ("data-row-index".to_string(), row.to_string()),
            ("data-col-index".to_string(), col.to_string()),
            ("tabindex".to_string(), "0".to_string()),
        ]);
        self.content_attributes = BTreeMap::from([
            (
                "class".to_string(),
                format!("dt-cell__content dt-cell__content--col-{col}"),
            ),
            ("title".to_string(), self.content.to_text()),
        ]);
    }

    fn at_row(mut self, row_index: usize) -> Self {
        self.row_index = row_index;
        self.stamp();
        self
    }
}

/// Tree/grouping metadata of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMeta {
    pub row_index: usize,
    pub indent: usize,
    pub is_leaf: bool,
    pub is_tree_node_close: bool,
}

impl Default for RowMeta {
    fn default() -> Self {
        Self {
            row_index: 0,
            indent: 0,
            is_leaf: true,
            is_tree_node_close: false,
        }
    }
}

/// An ordered sequence of visible cells.
///
/// Rows are values: re-positioning produces a new row.
#[derive(Debug, Clone)]
pub struct Row {
    pub cells: Vec<Cell>,
    pub meta: RowMeta,
    pub is_total_row: bool,
}

impl Row {
    /// Creates a body row.
    pub fn new(cells: Vec<Cell>, meta: RowMeta) -> Self {
        Self {
            cells,
            meta,
            is_total_row: false,
        }
    }

    /// Creates a footer row.
    pub fn total(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            meta: RowMeta::default(),
            is_total_row: true,
        }
    }

    /// Returns the cell of the column at `col_index`, if it is visible.
    pub fn cell(&self, col_index: usize) -> Option<&Cell> {
        self.cells.iter().find(|c| c.col_index == col_index)
    }

    /// Returns the content of the column at `col_index`.
    pub fn content(&self, col_index: usize) -> Option<&Value> {
        self.cell(col_index).map(|c| &c.content)
    }

    /// Rebuilds this row at a new position.
    pub fn at_position(self, row_index: usize) -> Self {
        Self {
            cells: self.cells.into_iter().map(|c| c.at_row(row_index)).collect(),
            meta: RowMeta {
                row_index,
                ..self.meta
            },
            is_total_row: self.is_total_row,
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_attributes() {
        let column = Arc::new(Column::new("name", "Name"));
        let cell = Cell::new(Value::from("A"), 3, column);

        assert_eq!(cell.attributes["data-row-index"], "3");
        assert_eq!(cell.attributes["class"], "dt-cell dt-cell--col-0 dt-cell--0-3 dt-cell--row-3");
        assert_eq!(cell.content_attributes["title"], "A");
    }

    #[test]
    fn test_at_position_restamps() {
        let column = Arc::new(Column::new("name", "Name"));
        let row = Row::new(vec![Cell::new(Value::from("A"), 3, column)], RowMeta::default());
        let moved = row.at_position(0);

        assert_eq!(moved.meta.row_index, 0);
        assert_eq!(moved.cells[0].row_index, 0);
        assert_eq!(moved.cells[0].attributes["data-row-index"], "0");
        assert_eq!(moved.cells[0].content, Value::from("A"));
    }
}
