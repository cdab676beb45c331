//! Scroll-driven lazy loading
//!
//! The coordinator is a two-state machine, idle and loading. A scroll past
//! the threshold while idle fetches the next page and merges it into the
//! cumulative record window held by the [`DataSourceContext`].

mod context;

pub use context::*;

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use log::warn;
use tokio::time::Instant;

use crate::config::GridConfig;
use crate::error::Error;
use crate::model::Record;

/// Fetch state of the coordinator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Loading {
    #[default]
    Idle,
    /// A request is in flight.
    Fetching,
    /// A page was merged; scrolls are dropped until `release_at`.
    Settling { release_at: Instant },
}

impl Loading {
    /// Returns `true` if a scroll at `now` must be dropped.
    pub fn is_busy(&self, now: Instant) -> bool {
        match self {
            Loading::Idle => false,
            Loading::Fetching => true,
            Loading::Settling { release_at } => now < *release_at,
        }
    }
}

/// Paging position of the cumulative window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageState {
    /// Offset of the last fetched page.
    pub offset: usize,
    /// Size of the last fetched page.
    pub page_size: usize,
    pub total_count: usize,
    pub loading: Loading,
}

/// Viewport scroll metrics, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPosition {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollPosition {
    pub fn new(scroll_top: f64, client_height: f64, scroll_height: f64) -> Self {
        Self {
            scroll_top,
            client_height,
            scroll_height,
        }
    }

    /// Returns `true` once the bottom of the viewport passes `threshold` of
    /// the scroll height.
    pub fn reached(&self, threshold: f64) -> bool {
        self.scroll_top + self.client_height >= threshold * self.scroll_height
    }
}

/// A snapshot of the cumulative record window.
///
/// `revision` increases with every change to the window, so a consumer can
/// drop a snapshot older than one it already rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub revision: u64,
    pub records: Vec<Record>,
}

impl Window {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Result of handling one scroll event.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollOutcome {
    /// The viewport is not near the bottom.
    BelowThreshold,
    /// Every matching record is loaded.
    Exhausted,
    /// A page is loading or settling; the event was dropped.
    Busy,
    /// A page was merged; carries the whole window.
    Loaded(Window),
    /// A filter or sort reload superseded the request.
    Stale,
}

/// Drives lazy loading from scroll events.
///
/// At most one fetch is outstanding. The context lock is never held across
/// the fetch.
#[derive(Debug, Clone)]
pub struct PaginationCoordinator {
    context: Arc<DataSourceContext>,
    threshold: f64,
    settle_delay: Duration,
    page_size: usize,
}

impl PaginationCoordinator {
    pub fn new(context: Arc<DataSourceContext>, config: &GridConfig) -> Self {
        Self {
            context,
            threshold: config.scroll_threshold,
            settle_delay: config.settle_delay,
            page_size: config.page_size,
        }
    }

    pub fn context(&self) -> &Arc<DataSourceContext> {
        &self.context
    }

    /// The page size of the next load: the user's pick, else the configured one.
    pub async fn next_page_size(&self) -> usize {
        self.context.selected_page_size().await.unwrap_or(self.page_size)
    }

    /// Handles a scroll event.
    ///
    /// On failure the coordinator is released immediately and the window and
    /// page state are left as they were.
    pub async fn on_scroll(&self, position: ScrollPosition) -> Result<ScrollOutcome, Error> {
        if !position.reached(self.threshold) {
            return Ok(ScrollOutcome::BelowThreshold);
        }

        let (query, generation) = {
            let mut state = self.context.lock().await;
            if state.page.loading.is_busy(Instant::now()) {
                return Ok(ScrollOutcome::Busy);
            }
            state.page.loading = Loading::Idle;

            if state.records.len() >= state.page.total_count {
                return Ok(ScrollOutcome::Exhausted);
            }

            let page_size = state.selected_page_size.unwrap_or(self.page_size);
            let offset = state.page.offset + state.page.page_size;
            state.page.loading = Loading::Fetching;
            let query = self.context.query(&state.conditions, state.sort.as_ref(), offset, page_size);
            (query, state.generation)
        };

        debug!(
            "fetching {} records of {} at offset {}",
            query.page_size,
            self.context.entity(),
            query.offset
        );
        let result = self.context.source().fetch(&query).await;

        let mut state = self.context.lock().await;
        if state.generation != generation {
            debug!("discarding stale page at offset {}", query.offset);
            return Ok(ScrollOutcome::Stale);
        }

        match result {
            Ok(page) => {
                state.records.truncate(query.offset);
                state.page.total_count = page.total_count();
                state.records.extend(page.into_records());
                state.page.offset = query.offset;
                state.page.page_size = query.page_size;
                state.page.loading = Loading::Settling {
                    release_at: Instant::now() + self.settle_delay,
                };
                state.revision += 1;
                Ok(ScrollOutcome::Loaded(state.window()))
            }
            Err(e) => {
                warn!("page fetch at offset {} failed: {}", query.offset, e);
                state.page.loading = Loading::Idle;
                Err(e.into())
            }
        }
    }
}
