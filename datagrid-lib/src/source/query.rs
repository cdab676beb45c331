//! Query sent to a data source.

use crate::filter::Condition;
use crate::model::SortOrder;

/// A filtered, sorted, paged request for records of one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub entity: String,
    pub conditions: Vec<Condition>,
    /// `(field, order)` to sort by.
    pub sort: Option<(String, SortOrder)>,
    pub offset: usize,
    pub page_size: usize,
}

impl Query {
    /// Creates an unfiltered query for the first page.
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            conditions: Vec::new(),
            sort: None,
            offset: 0,
            page_size: 0,
        }
    }

    /// Adds conditions.
    pub fn conditions(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    /// Sets the sort field; `SortOrder::None` clears it.
    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = order.is_sorted().then(|| (field.into(), order));
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}
