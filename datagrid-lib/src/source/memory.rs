//! In-memory data source

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use tokio::sync::RwLock;

use super::DataSource;
use super::Page;
use super::Query;
use crate::error::SourceError;
use crate::model::Record;
use crate::model::SortOrder;
use crate::model::Value;
use crate::view::compare_values;

/// A data source over a vector of records.
///
/// Conditions are evaluated per record, the sort is stable, and the
/// reported total counts every match before slicing.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::Record;
/// use datagrid_lib::source::InMemorySource;
///
/// let source = InMemorySource::new(vec![Record::new().set("name", "A")]);
/// assert_eq!(source.fetch_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct InMemorySource {
    records: RwLock<Vec<Record>>,
    latency: Option<Duration>,
    fetches: AtomicUsize,
}

impl InMemorySource {
    /// Creates a source over the given records.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: RwLock::new(records),
            latency: None,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Delays every fetch by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Replaces the records.
    pub async fn replace(&self, records: Vec<Record>) {
        *self.records.write().await = records;
    }

    /// Number of fetches answered so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for InMemorySource {
    async fn fetch(&self, query: &Query) -> Result<Page, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let records = self.records.read().await;
        let mut matched: Vec<&Record> = records
            .iter()
            .filter(|r| query.conditions.iter().all(|c| c.matches(r, &query.entity)))
            .collect();

        if let Some((field, order)) = &query.sort {
            let null = Value::Null;
            matched.sort_by(|a, b| {
                let x = a.get(field).unwrap_or(&null);
                let y = b.get(field).unwrap_or(&null);
                match order {
                    SortOrder::Desc => compare_values(y, x),
                    _ => compare_values(x, y),
                }
            });
        }

        let total_count = matched.len();
        let page: Vec<Record> = matched
            .into_iter()
            .skip(query.offset)
            .take(query.page_size)
            .cloned()
            .collect();

        debug!(
            "{}: {} of {} records at offset {}",
            query.entity,
            page.len(),
            total_count,
            query.offset
        );
        Ok(Page::new(page, total_count))
    }
}
