//! Filter inference, evaluation and remote conditions

mod condition;
mod date;
mod evaluate;
mod infer;
mod plan;

use std::collections::BTreeMap;

pub use condition::*;
pub use date::*;
pub use evaluate::*;
pub use infer::*;
pub use plan::resolve;

/// Keywords typed into column filters, keyed by `col_index`.
///
/// Setting an empty keyword removes the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    keywords: BTreeMap<usize, String>,
}

impl FilterSet {
    /// Creates an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the keyword of a column.
    pub fn set(&mut self, col_index: usize, keyword: impl Into<String>) {
        let keyword = keyword.into();
        if keyword.is_empty() {
            self.keywords.remove(&col_index);
        } else {
            self.keywords.insert(col_index, keyword);
        }
    }

    /// Returns the keyword of a column.
    pub fn get(&self, col_index: usize) -> Option<&str> {
        self.keywords.get(&col_index).map(String::as_str)
    }

    /// Removes a column's keyword.
    pub fn remove(&mut self, col_index: usize) -> Option<String> {
        self.keywords.remove(&col_index)
    }

    /// Iterates `(col_index, keyword)` in column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.keywords.iter().map(|(i, k)| (*i, k.as_str()))
    }

    /// Number of active filters.
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Returns `true` if no filter is active.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Removes every filter.
    pub fn clear(&mut self) {
        self.keywords.clear();
    }

    /// Re-keys the filters after two columns swapped places.
    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        let first = self.keywords.remove(&a);
        let second = self.keywords.remove(&b);
        if let Some(k) = first {
            self.keywords.insert(b, k);
        }
        if let Some(k) = second {
            self.keywords.insert(a, k);
        }
    }

    /// Drops the filter of a removed column and shifts later columns down.
    pub(crate) fn remove_column(&mut self, col_index: usize) {
        self.keywords = std::mem::take(&mut self.keywords)
            .into_iter()
            .filter(|(i, _)| *i != col_index)
            .map(|(i, k)| if i > col_index { (i - 1, k) } else { (i, k) })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_keyword_removes_entry() {
        let mut filters = FilterSet::new();
        filters.set(2, "abc");
        assert_eq!(filters.get(2), Some("abc"));

        filters.set(2, "");
        assert!(filters.is_empty());
    }

    #[test]
    fn test_swap_and_remove_rekey() {
        let mut filters = FilterSet::new();
        filters.set(0, "a");
        filters.set(2, "c");
        filters.set(3, "d");

        filters.swap(0, 1);
        assert_eq!(filters.get(1), Some("a"));
        assert_eq!(filters.get(0), None);

        filters.remove_column(2);
        assert_eq!(filters.iter().collect::<Vec<_>>(), vec![(1, "a"), (2, "d")]);
    }
}
