//! Shared query context for the grid and the pagination coordinator.

use std::fmt;
use std::sync::Arc;

use log::debug;
use tokio::sync::Mutex;
use tokio::sync::MutexGuard;

use super::Loading;
use super::PageState;
use super::Window;
use crate::error::SourceError;
use crate::filter::Condition;
use crate::model::Record;
use crate::model::SortOrder;
use crate::source::DataSource;
use crate::source::Query;

#[derive(Debug, Default)]
pub(crate) struct ContextState {
    pub(crate) page: PageState,
    pub(crate) selected_page_size: Option<usize>,
    pub(crate) records: Vec<Record>,
    pub(crate) conditions: Vec<Condition>,
    pub(crate) sort: Option<(String, SortOrder)>,
    pub(crate) generation: u64,
    /// Bumped whenever `records` changes.
    pub(crate) revision: u64,
}

impl ContextState {
    pub(crate) fn window(&self) -> Window {
        Window {
            revision: self.revision,
            records: self.records.clone(),
        }
    }
}

/// The data source, entity and query state of one grid.
///
/// Every filter or sort reload bumps the generation; responses to requests
/// issued under an older generation are discarded.
pub struct DataSourceContext {
    source: Arc<dyn DataSource>,
    entity: String,
    base_conditions: Vec<Condition>,
    state: Mutex<ContextState>,
}

impl DataSourceContext {
    /// Creates a context over a source for one entity.
    pub fn new(source: Arc<dyn DataSource>, entity: impl Into<String>) -> Self {
        Self {
            source,
            entity: entity.into(),
            base_conditions: Vec::new(),
            state: Mutex::new(ContextState::default()),
        }
    }

    /// Adds conditions sent with every query.
    pub fn with_base_conditions(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.base_conditions.extend(conditions);
        self
    }

    /// The entity queried.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn base_conditions(&self) -> &[Condition] {
        &self.base_conditions
    }

    pub(crate) fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, ContextState> {
        self.state.lock().await
    }

    /// Builds a query, base conditions first.
    pub(crate) fn query(
        &self,
        conditions: &[Condition],
        sort: Option<&(String, SortOrder)>,
        offset: usize,
        page_size: usize,
    ) -> Query {
        let mut query = Query::new(&self.entity)
            .conditions(self.base_conditions.iter().cloned())
            .conditions(conditions.iter().cloned())
            .offset(offset)
            .page_size(page_size);
        query.sort = sort.cloned();
        query
    }

    /// Loads the first page of a new query template.
    ///
    /// Returns `Ok(None)` if a newer load started while this one was in
    /// flight. The template, window and page state are replaced only when
    /// the fetch succeeds; on failure the previous ones stay in place.
    pub async fn load(
        &self,
        conditions: Vec<Condition>,
        sort: Option<(String, SortOrder)>,
        page_size: usize,
    ) -> Result<Option<Window>, SourceError> {
        let query = self.query(&conditions, sort.as_ref(), 0, page_size);
        let generation = {
            let mut state = self.lock().await;
            state.generation += 1;
            state.page.loading = Loading::Fetching;
            state.generation
        };

        debug!(
            "loading {} with {} conditions, generation {}",
            self.entity,
            query.conditions.len(),
            generation
        );
        let result = self.source.fetch(&query).await;

        let mut state = self.lock().await;
        if state.generation != generation {
            debug!("discarding stale load of generation {}", generation);
            return Ok(None);
        }
        state.page.loading = Loading::Idle;
        let page = result?;

        state.conditions = conditions;
        state.sort = sort;
        state.page = PageState {
            offset: 0,
            page_size,
            total_count: page.total_count(),
            loading: Loading::Idle,
        };
        state.records = page.into_records();
        state.revision += 1;
        Ok(Some(state.window()))
    }

    /// Discards every in-flight response.
    pub async fn invalidate(&self) -> u64 {
        let mut state = self.lock().await;
        state.generation += 1;
        state.page.loading = Loading::Idle;
        state.generation
    }

    pub async fn generation(&self) -> u64 {
        self.lock().await.generation
    }

    /// Returns a snapshot of the page state.
    pub async fn page_state(&self) -> PageState {
        self.lock().await.page
    }

    /// Returns the cumulative record window.
    pub async fn records(&self) -> Vec<Record> {
        self.lock().await.records.clone()
    }

    /// Returns the cumulative record window with its revision.
    pub async fn window(&self) -> Window {
        self.lock().await.window()
    }

    /// Sets the page size picked by the user; `None` restores the default.
    pub async fn select_page_size(&self, size: Option<usize>) {
        self.lock().await.selected_page_size = size;
    }

    /// The page size picked by the user, if any.
    pub async fn selected_page_size(&self) -> Option<usize> {
        self.lock().await.selected_page_size
    }
}

impl fmt::Debug for DataSourceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSourceContext")
            .field("entity", &self.entity)
            .field("base_conditions", &self.base_conditions)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::sync::atomic::Ordering;

    use async_trait::async_trait;

    use super::*;
    use crate::source::InMemorySource;
    use crate::source::Page;

    fn context() -> DataSourceContext {
        let records = (0..5).map(|i| Record::new().set("n", i).set("active", i != 2)).collect();
        DataSourceContext::new(Arc::new(InMemorySource::new(records)), "item")
            .with_base_conditions([Condition::eq("item", "active", "true")])
    }

    /// Fails every fetch while `fail` is set.
    struct Flaky {
        inner: InMemorySource,
        fail: AtomicBool,
    }

    #[async_trait]
    impl DataSource for Flaky {
        async fn fetch(&self, query: &Query) -> Result<Page, SourceError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(SourceError::transient("connection reset"));
            }
            self.inner.fetch(query).await
        }
    }

    #[tokio::test]
    async fn test_load_prepends_base_conditions() {
        let context = context();
        let window = context
            .load(vec![Condition::gt("item", "n", 0.0)], None, 10)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(window.len(), 3);
        let state = context.page_state().await;
        assert_eq!(state.total_count, 3);
        assert_eq!(state.page_size, 10);
        assert_eq!(state.loading, Loading::Idle);
    }

    #[tokio::test]
    async fn test_load_bumps_generation_and_revision() {
        let context = context();
        let before = context.generation().await;
        let first = context.load(Vec::new(), None, 10).await.unwrap().unwrap();
        let second = context.load(Vec::new(), None, 10).await.unwrap().unwrap();

        assert_eq!(context.generation().await, before + 2);
        assert!(second.revision > first.revision);
        assert_eq!(context.window().await.revision, second.revision);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_template() {
        let source = Arc::new(Flaky {
            inner: InMemorySource::new((0..6).map(|i| Record::new().set("n", i).set("even", i % 2 == 0)).collect()),
            fail: AtomicBool::new(false),
        });
        let context = DataSourceContext::new(source.clone(), "item");
        context.load(Vec::new(), None, 2).await.unwrap();

        source.fail.store(true, Ordering::SeqCst);
        let err = context.load(vec![Condition::eq("item", "even", "true")], None, 2).await;
        assert!(err.is_err());

        let state = context.lock().await;
        assert!(state.conditions.is_empty());
        assert_eq!(state.page.total_count, 6);
        assert_eq!(state.page.loading, Loading::Idle);
        assert_eq!(state.records.len(), 2);
    }

    #[tokio::test]
    async fn test_selected_page_size() {
        let context = context();
        assert_eq!(context.selected_page_size().await, None);

        context.select_page_size(Some(20)).await;
        assert_eq!(context.selected_page_size().await, Some(20));
    }
}
