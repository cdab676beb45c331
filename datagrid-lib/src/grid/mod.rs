//! Grid orchestration
//!
//! [`Grid`] owns the column model and filter set, drives the data source
//! context, and hands a [`GridView`] to a [`GridRenderer`] after every
//! change.

pub mod debounce;

pub use debounce::FilterDebouncer;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use log::debug;
use log::warn;
use tokio::sync::Mutex;

use crate::config::GridConfig;
use crate::error::Error;
use crate::filter::Condition;
use crate::filter::FilterSet;
use crate::filter::rows_to_show;
use crate::filter::to_condition;
use crate::model::ColumnModel;
use crate::model::Row;
use crate::model::SortOrder;
use crate::pagination::DataSourceContext;
use crate::pagination::PaginationCoordinator;
use crate::pagination::ScrollOutcome;
use crate::pagination::ScrollPosition;
use crate::pagination::Window;
use crate::view::Aggregator;
use crate::view::RowFormatter;
use crate::view::sort;

/// What the renderer should paint.
#[derive(Debug, Clone)]
pub enum GridView {
    /// No row passes the filters.
    Empty { message: String },
    /// Rows in display order.
    Rows {
        rows: Vec<Row>,
        item_height: u32,
        total_row: Option<Row>,
    },
}

impl GridView {
    /// Rows in display order; empty for [`GridView::Empty`].
    pub fn rows(&self) -> &[Row] {
        match self {
            GridView::Empty { .. } => &[],
            GridView::Rows { rows, .. } => rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, GridView::Empty { .. })
    }
}

/// Paints grid views.
///
/// `freeze` and `unfreeze` bracket sorts and structural column changes.
pub trait GridRenderer: Send + Sync {
    fn freeze(&self);

    fn unfreeze(&self);

    fn render(&self, view: &GridView);

    /// Called once the rendered layout has settled.
    fn after_render(&self) {}
}

#[derive(Debug)]
struct GridState {
    columns: ColumnModel,
    filters: FilterSet,
    /// Formatted, sorted rows of the whole window.
    rows: Vec<Row>,
    /// Positions in `rows` passing the filters.
    shown: Vec<usize>,
    /// Revision of the window `rows` was built from.
    revision: u64,
}

/// Releases the freeze when dropped.
struct FreezeGuard<'a> {
    grid: &'a Grid,
}

impl Drop for FreezeGuard<'_> {
    fn drop(&mut self) {
        self.grid.frozen.store(false, Ordering::SeqCst);
        self.grid.renderer.unfreeze();
    }
}

/// A filterable, sortable, lazily paged grid.
///
/// # Example
///
/// ```ignore
/// let context = Arc::new(DataSourceContext::new(source, "invoice"));
/// let grid = Grid::new(context, columns, renderer, GridConfig::default());
///
/// grid.refresh().await?;
/// grid.set_filter(1, ">100").await?;
/// grid.sort_column(2, SortOrder::Desc).await?;
/// grid.on_scroll(ScrollPosition::new(900.0, 300.0, 1200.0)).await?;
/// ```
pub struct Grid {
    config: GridConfig,
    context: Arc<DataSourceContext>,
    coordinator: PaginationCoordinator,
    renderer: Arc<dyn GridRenderer>,
    formatter: RowFormatter,
    aggregator: Aggregator,
    debouncer: FilterDebouncer,
    state: Mutex<GridState>,
    frozen: AtomicBool,
}

impl Grid {
    pub fn new(
        context: Arc<DataSourceContext>,
        columns: ColumnModel,
        renderer: impl GridRenderer + 'static,
        config: GridConfig,
    ) -> Self {
        Self {
            coordinator: PaginationCoordinator::new(context.clone(), &config),
            debouncer: FilterDebouncer::new(config.filter_debounce),
            context,
            renderer: Arc::new(renderer),
            formatter: RowFormatter::new(),
            aggregator: Aggregator::new(),
            state: Mutex::new(GridState {
                columns,
                filters: FilterSet::new(),
                rows: Vec::new(),
                shown: Vec::new(),
                revision: 0,
            }),
            frozen: AtomicBool::new(false),
            config,
        }
    }

    /// Replaces the row formatter.
    pub fn with_formatter(mut self, formatter: RowFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Replaces the total row aggregator.
    pub fn with_aggregator(mut self, aggregator: Aggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn context(&self) -> &Arc<DataSourceContext> {
        &self.context
    }

    /// Height of one row, in pixels.
    pub fn item_height(&self) -> u32 {
        self.config.cell_height
    }

    /// Returns `true` while a sort or structural change is running.
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::SeqCst)
    }

    pub async fn columns(&self) -> ColumnModel {
        self.state.lock().await.columns.clone()
    }

    pub async fn filters(&self) -> FilterSet {
        self.state.lock().await.filters.clone()
    }

    // =========================================================================
    // Loading and filtering
    // =========================================================================

    /// Loads the first page under the current filters and sort.
    pub async fn refresh(&self) -> Result<(), Error> {
        self.apply_filters().await
    }

    /// Records a filter keystroke and applies the filters once input settles.
    ///
    /// Returns `Ok(false)` when a newer keystroke superseded this one.
    pub async fn set_filter(&self, col_index: usize, keyword: impl Into<String>) -> Result<bool, Error> {
        {
            let mut state = self.state.lock().await;
            if state.columns.get(col_index).is_none() {
                return Err(Error::UnknownColumn(col_index));
            }
            state.filters.set(col_index, keyword);
        }

        if !self.debouncer.debounce().await {
            return Ok(false);
        }
        self.apply_filters().await?;
        Ok(true)
    }

    /// Removes every filter and reloads.
    pub async fn clear_filters(&self) -> Result<(), Error> {
        self.state.lock().await.filters.clear();
        self.apply_filters().await
    }

    /// Reloads from offset zero with the current filters and sort.
    ///
    /// Keywords a column rejects are left out of the remote query and hide
    /// every row locally.
    pub async fn apply_filters(&self) -> Result<(), Error> {
        let (conditions, sort_field) = self.remote_query().await;
        let page_size = self.coordinator.next_page_size().await;
        self.load(conditions, sort_field, page_size).await
    }

    async fn remote_query(&self) -> (Vec<Condition>, Option<(String, SortOrder)>) {
        let state = self.state.lock().await;
        let mut conditions = Vec::new();
        for (col_index, keyword) in state.filters.iter() {
            let Some(column) = state.columns.get(col_index) else {
                warn!("skipping filter on unknown column {}", col_index);
                continue;
            };
            match to_condition(column, keyword, self.context.entity()) {
                Ok(Some(condition)) => conditions.push(condition),
                Ok(None) => {}
                Err(e) => warn!("no condition for column {}: {}", column.id, e),
            }
        }

        let sort_field = state.columns.sort_spec().and_then(|spec| {
            state
                .columns
                .get(spec.col_index)
                .map(|column| (column.field().to_string(), spec.order))
        });
        (conditions, sort_field)
    }

    async fn load(
        &self,
        conditions: Vec<Condition>,
        sort_field: Option<(String, SortOrder)>,
        page_size: usize,
    ) -> Result<(), Error> {
        match self.context.load(conditions, sort_field, page_size).await? {
            Some(window) => {
                self.rebuild(&window).await;
                Ok(())
            }
            None => {
                debug!("load superseded by a newer one");
                Ok(())
            }
        }
    }

    /// Reformats the window, sorts it, applies filters locally and renders.
    ///
    /// A window older than the one already shown is dropped.
    async fn rebuild(&self, window: &Window) {
        let view = {
            let mut state = self.state.lock().await;
            if window.revision < state.revision {
                debug!(
                    "skipping window revision {}, revision {} is shown",
                    window.revision, state.revision
                );
                return;
            }
            state.revision = window.revision;
            let mut rows = self.formatter.format(&window.records, &state.columns);
            if let Some(spec) = state.columns.sort_spec() {
                rows = sort(rows, spec.col_index, spec.order);
            }
            state.shown = rows_to_show(&state.filters, &rows, &state.columns);
            state.rows = rows;
            self.build_view(&state)
        };
        self.renderer.render(&view);
        self.renderer.after_render();
    }

    fn build_view(&self, state: &GridState) -> GridView {
        if state.shown.is_empty() {
            return GridView::Empty {
                message: self.config.no_data_message.clone(),
            };
        }

        let rows: Vec<Row> = state.shown.iter().map(|&i| state.rows[i].clone()).collect();
        let total_row = self
            .config
            .show_total_row
            .then(|| self.aggregator.compute_totals(&rows, &state.columns));
        GridView::Rows {
            rows,
            item_height: self.config.cell_height,
            total_row,
        }
    }

    // =========================================================================
    // Sorting and structural changes
    // =========================================================================

    fn freeze(&self) -> Result<FreezeGuard<'_>, Error> {
        if self.frozen.swap(true, Ordering::SeqCst) {
            return Err(Error::Frozen);
        }
        self.renderer.freeze();
        Ok(FreezeGuard { grid: self })
    }

    /// Sorts by one column, clearing any other column's order.
    ///
    /// The data is reloaded with the sort page size so the client-side sort
    /// sees as many records as possible.
    pub async fn sort_column(&self, col_index: usize, order: SortOrder) -> Result<(), Error> {
        let _frozen = self.freeze()?;
        self.state.lock().await.columns.set_sort(col_index, order)?;

        let (conditions, sort_field) = self.remote_query().await;
        self.load(conditions, sort_field, self.config.sort_page_size).await
    }

    /// Removes a column and its filter.
    pub async fn remove_column(&self, col_index: usize) -> Result<(), Error> {
        let _frozen = self.freeze()?;
        {
            let mut state = self.state.lock().await;
            let removed = state.columns.remove(col_index)?;
            state.filters.remove_column(col_index);
            debug!("removed column {}", removed.id);
        }
        self.reformat().await;
        Ok(())
    }

    /// Swaps two columns.
    pub async fn switch_column(&self, a: usize, b: usize) -> Result<(), Error> {
        let _frozen = self.freeze()?;
        {
            let mut state = self.state.lock().await;
            state.columns.switch(a, b)?;
            state.filters.swap(a, b);
        }
        self.reformat().await;
        Ok(())
    }

    /// Shows or hides a column.
    pub async fn set_column_visible(&self, col_index: usize, visible: bool) -> Result<(), Error> {
        let _frozen = self.freeze()?;
        self.state.lock().await.columns.set_visible(col_index, visible)?;
        self.reformat().await;
        Ok(())
    }

    /// Resizes a column; `Ok(false)` if the width was refused.
    pub async fn set_column_width(&self, col_index: usize, width: u32) -> Result<bool, Error> {
        let _frozen = self.freeze()?;
        let resized = self.state.lock().await.columns.set_width(
            col_index,
            width,
            self.config.minimum_column_width,
        )?;
        if resized {
            self.reformat().await;
        }
        Ok(resized)
    }

    async fn reformat(&self) {
        let window = self.context.window().await;
        self.rebuild(&window).await;
    }

    // =========================================================================
    // Scrolling and pull access
    // =========================================================================

    /// Handles a scroll event, re-rendering when a page was merged.
    pub async fn on_scroll(&self, position: ScrollPosition) -> Result<ScrollOutcome, Error> {
        let outcome = self.coordinator.on_scroll(position).await?;
        if let ScrollOutcome::Loaded(window) = &outcome {
            self.rebuild(window).await;
        }
        Ok(outcome)
    }

    /// Sets the load page size; `None` restores the configured one.
    pub async fn select_page_size(&self, size: Option<usize>) {
        self.context.select_page_size(size).await;
    }

    /// Returns the current view.
    pub async fn view(&self) -> GridView {
        self.build_view(&*self.state.lock().await)
    }

    /// Number of rows passing the filters.
    pub async fn row_count(&self) -> usize {
        self.state.lock().await.shown.len()
    }

    /// Returns the shown row at a display position.
    pub async fn row_at(&self, index: usize) -> Option<Row> {
        let state = self.state.lock().await;
        let row = state.shown.get(index).map(|&i| state.rows[i].clone());
        if row.is_none() {
            warn!("row {} requested but only {} rows are shown", index, state.shown.len());
        }
        row
    }
}
