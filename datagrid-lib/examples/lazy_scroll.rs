//! Scrolls a grid over a slow in-memory source, filtering and sorting along
//! the way.
//!
//! Run with: `cargo run -p datagrid-lib --example lazy_scroll`

use std::sync::Arc;
use std::time::Duration;

use datagrid_lib::model::Column;
use datagrid_lib::model::ColumnModel;
use datagrid_lib::model::FieldType;
use datagrid_lib::model::Record;
use datagrid_lib::model::SortOrder;
use datagrid_lib::pagination::DataSourceContext;
use datagrid_lib::pagination::ScrollOutcome;
use datagrid_lib::pagination::ScrollPosition;
use datagrid_lib::source::InMemorySource;
use datagrid_lib::Grid;
use datagrid_lib::GridConfig;
use datagrid_lib::GridRenderer;
use datagrid_lib::GridView;
use log::info;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;

/// Logs what a real renderer would paint.
struct LogRenderer;

impl GridRenderer for LogRenderer {
    fn freeze(&self) {
        info!("renderer frozen");
    }

    fn unfreeze(&self) {
        info!("renderer unfrozen");
    }

    fn render(&self, view: &GridView) {
        match view {
            GridView::Empty { message } => info!("{}", message),
            GridView::Rows { rows, total_row, .. } => {
                let first = rows.first().and_then(|r| r.content(1)).map(|v| v.to_text());
                info!("{} rows, first {:?}", rows.len(), first.unwrap_or_default());
                if let Some(total) = total_row.as_ref().and_then(|t| t.content(3)) {
                    info!("total amount {}", total);
                }
            }
        }
    }
}

fn invoices() -> Vec<Record> {
    let customers = ["Contoso", "Fabrikam", "Northwind", "Tailspin"];
    (0..450)
        .map(|i| {
            Record::new()
                .set("number", format!("INV-{:04}", i))
                .set("customer", customers[i % customers.len()])
                .set("amount", ((i * 37) % 1000) as i64 - 200)
                .set("status", if i % 3 == 0 { "Paid" } else { "Open" })
        })
        .collect()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), datagrid_lib::Error> {
    TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .expect("Failed to initialize logger");

    let source = Arc::new(InMemorySource::new(invoices()).with_latency(Duration::from_millis(50)));
    let context = Arc::new(DataSourceContext::new(source, "invoice"));
    let columns = ColumnModel::new([
        Column::row_index(),
        Column::new("number", "Number"),
        Column::new("customer", "Customer").field_type(FieldType::Link),
        Column::new("amount", "Amount").field_type(FieldType::Number),
        Column::new("status", "Status").field_type(FieldType::Select),
    ]);
    let config = GridConfig::default().with_total_row(true);
    let grid = Grid::new(context, columns, LogRenderer, config);

    grid.refresh().await?;

    let mut scroll_top = 0.0;
    loop {
        let scroll_height = grid.row_count().await as f64 * f64::from(grid.item_height());
        scroll_top += 400.0;
        match grid.on_scroll(ScrollPosition::new(scroll_top, 600.0, scroll_height)).await? {
            ScrollOutcome::Exhausted => break,
            ScrollOutcome::Busy => tokio::time::sleep(grid.config().settle_delay).await,
            ScrollOutcome::Loaded(window) => info!("window now holds {} records", window.len()),
            _ => {}
        }
    }
    info!("loaded {} rows", grid.row_count().await);

    grid.set_filter(4, "Open").await?;
    grid.set_filter(3, ">500").await?;
    info!("{} open invoices over 500", grid.row_count().await);

    grid.sort_column(3, SortOrder::Desc).await?;
    if let Some(row) = grid.row_at(0).await {
        info!("largest: {:?}", row.content(1));
    }

    Ok(())
}
