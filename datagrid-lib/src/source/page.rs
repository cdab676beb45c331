//! Page type for paginated query results.

use crate::model::Record;

/// A page of query results with the total number of matching records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    records: Vec<Record>,
    total_count: usize,
}

impl Page {
    /// Creates a new page with records and the total match count.
    pub fn new(records: Vec<Record>, total_count: usize) -> Self {
        Self {
            records,
            total_count,
        }
    }

    /// Returns a reference to the records in this page.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the page and returns the records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Total number of records matching the query, across all pages.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Returns the number of records in this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if this page contains no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
