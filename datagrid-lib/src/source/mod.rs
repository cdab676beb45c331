//! Data source seam
//!
//! Provides the `DataSource` trait the grid pulls records from and an
//! in-memory implementation.

mod memory;
mod page;
mod query;

pub use memory::*;
pub use page::*;
pub use query::*;

use async_trait::async_trait;

use crate::error::SourceError;

/// A remote collaborator answering filtered, sorted, paged queries.
///
/// Implementations are responsible for:
/// - Applying every condition of the query
/// - Ordering by the query's sort field, if any
/// - Returning at most `page_size` records starting at `offset`
/// - Reporting the total number of matching records
///
/// # Example
///
/// ```ignore
/// use datagrid_lib::source::{DataSource, InMemorySource, Query};
///
/// let source = InMemorySource::new(records);
/// let page = source.fetch(&Query::new("item").page_size(100)).await?;
///
/// println!("{} of {}", page.len(), page.total_count());
/// ```
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetches one page of records.
    async fn fetch(&self, query: &Query) -> Result<Page, SourceError>;
}
