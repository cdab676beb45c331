//! Grid configuration

use std::time::Duration;

/// Default number of records fetched per lazy-load page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Configuration for paging, debouncing and presentation.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use datagrid_lib::GridConfig;
///
/// let config = GridConfig::default()
///     .with_page_size(50)
///     .with_filter_debounce(Duration::from_millis(150))
///     .with_total_row(true);
/// ```
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Height of one row, in pixels.
    ///
    /// Default: 33
    pub cell_height: u32,

    /// Records fetched per lazy-load page when the user picked no page size.
    ///
    /// Default: 100
    pub page_size: usize,

    /// Records fetched when a sort reloads the data.
    ///
    /// Default: 10000
    pub sort_page_size: usize,

    /// Fraction of the scroll height that triggers the next page.
    ///
    /// Default: 0.8
    pub scroll_threshold: f64,

    /// Time a finished page load keeps the coordinator busy.
    ///
    /// Default: 200 ms
    pub settle_delay: Duration,

    /// Quiet period before a filter keystroke is applied.
    ///
    /// Default: 300 ms
    pub filter_debounce: Duration,

    /// Smallest width a column can be resized to.
    ///
    /// Default: 30
    pub minimum_column_width: u32,

    /// Whether the view carries a total row.
    ///
    /// Default: false
    pub show_total_row: bool,

    /// Message shown instead of an empty body.
    ///
    /// Default: "No Data"
    pub no_data_message: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_height: 33,
            page_size: DEFAULT_PAGE_SIZE,
            sort_page_size: 10_000,
            scroll_threshold: 0.8,
            settle_delay: Duration::from_millis(200),
            filter_debounce: Duration::from_millis(300),
            minimum_column_width: 30,
            show_total_row: false,
            no_data_message: "No Data".to_string(),
        }
    }
}

impl GridConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row height.
    pub fn with_cell_height(mut self, height: u32) -> Self {
        self.cell_height = height;
        self
    }

    /// Sets the default lazy-load page size.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Sets the page size used when sorting reloads data.
    pub fn with_sort_page_size(mut self, size: usize) -> Self {
        self.sort_page_size = size;
        self
    }

    /// Sets the scroll fraction that triggers a load, clamped to `0.0..=1.0`.
    pub fn with_scroll_threshold(mut self, threshold: f64) -> Self {
        self.scroll_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Sets the settle delay after a page load.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Sets the filter debounce window.
    pub fn with_filter_debounce(mut self, delay: Duration) -> Self {
        self.filter_debounce = delay;
        self
    }

    /// Sets the minimum column width.
    pub fn with_minimum_column_width(mut self, width: u32) -> Self {
        self.minimum_column_width = width;
        self
    }

    /// Enables or disables the total row.
    pub fn with_total_row(mut self, show: bool) -> Self {
        self.show_total_row = show;
        self
    }

    /// Sets the empty-state message.
    pub fn with_no_data_message(mut self, message: impl Into<String>) -> Self {
        self.no_data_message = message.into();
        self
    }
}
