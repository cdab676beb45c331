//! Column model with dense indices

use std::collections::HashSet;
use std::sync::Arc;

use log::debug;
use log::warn;

use super::Column;
use super::SortOrder;
use super::SortSpec;
use crate::error::Error;

/// Default minimum width applied when a column sets none.
pub const DEFAULT_MIN_WIDTH: u32 = 24;

/// The ordered set of columns of a grid.
///
/// `col_index` of every column equals its position and is recomputed on
/// every structural change.
#[derive(Debug, Clone, Default)]
pub struct ColumnModel {
    columns: Vec<Arc<Column>>,
}

impl ColumnModel {
    /// Creates a model, assigning dense indices in iteration order.
    ///
    /// Ids are unique; a column repeating an earlier id is dropped.
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Self {
        let mut seen = HashSet::new();
        let columns = columns
            .into_iter()
            .filter(|column| {
                let fresh = seen.insert(column.id.clone());
                if !fresh {
                    warn!("dropping column with duplicate id {}", column.id);
                }
                fresh
            })
            .map(Arc::new)
            .collect();
        let mut model = Self { columns };
        model.reindex();
        model
    }

    /// Returns the column at `col_index`.
    pub fn get(&self, col_index: usize) -> Option<&Arc<Column>> {
        self.columns.get(col_index)
    }

    /// Returns the column with the given identity.
    pub fn by_id(&self, id: &str) -> Option<&Arc<Column>> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Returns the index of the column with the given identity.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id(id).map(|c| c.col_index())
    }

    /// Iterates all columns in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Column>> {
        self.columns.iter()
    }

    /// Iterates visible columns in index order.
    pub fn visible(&self) -> impl Iterator<Item = &Arc<Column>> {
        self.columns.iter().filter(|c| c.visible)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the active sort, if exactly one column carries an order.
    pub fn sort_spec(&self) -> Option<SortSpec> {
        let mut sorted = self.columns.iter().filter(|c| c.sort_order.is_sorted());
        let column = sorted.next()?;
        if sorted.next().is_some() {
            return None;
        }
        Some(SortSpec {
            col_index: column.col_index(),
            order: column.sort_order,
        })
    }

    /// Sets the sort order of one column and clears every other column.
    pub fn set_sort(&mut self, col_index: usize, order: SortOrder) -> Result<(), Error> {
        if col_index >= self.columns.len() {
            return Err(Error::UnknownColumn(col_index));
        }
        for column in &mut self.columns {
            let next = if column.col_index() == col_index { order } else { SortOrder::None };
            if column.sort_order != next {
                Arc::make_mut(column).sort_order = next;
            }
        }
        Ok(())
    }

    /// Swaps two columns.
    pub fn switch(&mut self, a: usize, b: usize) -> Result<(), Error> {
        for index in [a, b] {
            if index >= self.columns.len() {
                return Err(Error::UnknownColumn(index));
            }
        }
        self.columns.swap(a, b);
        self.reindex();
        Ok(())
    }

    /// Removes a column, returning it.
    pub fn remove(&mut self, col_index: usize) -> Result<Arc<Column>, Error> {
        if col_index >= self.columns.len() {
            return Err(Error::UnknownColumn(col_index));
        }
        let removed = self.columns.remove(col_index);
        self.reindex();
        Ok(removed)
    }

    /// Shows or hides a column.
    pub fn set_visible(&mut self, col_index: usize, visible: bool) -> Result<(), Error> {
        let column = self.columns.get_mut(col_index).ok_or(Error::UnknownColumn(col_index))?;
        Arc::make_mut(column).visible = visible;
        Ok(())
    }

    /// Resizes a column.
    ///
    /// Returns `false` when the column is fixed or `width` is under its
    /// minimum (or `floor`, whichever is larger); the width is unchanged then.
    pub fn set_width(&mut self, col_index: usize, width: u32, floor: u32) -> Result<bool, Error> {
        let column = self.columns.get_mut(col_index).ok_or(Error::UnknownColumn(col_index))?;
        let minimum = column.min_width.unwrap_or(DEFAULT_MIN_WIDTH).max(floor);
        if !column.resizable || width < minimum {
            debug!("ignoring resize of column {} to {}px (min {}px)", column.id, width, minimum);
            return Ok(false);
        }
        Arc::make_mut(column).width = width;
        Ok(true)
    }

    fn reindex(&mut self) {
        for (index, column) in self.columns.iter_mut().enumerate() {
            if column.col_index != index {
                Arc::make_mut(column).col_index = index;
            }
        }
    }
}
