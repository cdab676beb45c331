//! End-to-end tests of the filter, sort and total pipeline.

use std::sync::Arc;
use std::sync::Mutex;

use datagrid_lib::model::Column;
use datagrid_lib::model::ColumnModel;
use datagrid_lib::model::FieldType;
use datagrid_lib::model::Record;
use datagrid_lib::model::SortOrder;
use datagrid_lib::model::Value;
use datagrid_lib::pagination::DataSourceContext;
use datagrid_lib::source::InMemorySource;
use datagrid_lib::Grid;
use datagrid_lib::GridConfig;
use datagrid_lib::GridRenderer;
use datagrid_lib::GridView;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TestLogger;

fn init_logging() {
    let _ = TestLogger::init(LevelFilter::Debug, Config::default());
}

#[derive(Default, Clone)]
struct LastView {
    view: Arc<Mutex<Option<GridView>>>,
}

impl GridRenderer for LastView {
    fn freeze(&self) {}

    fn unfreeze(&self) {}

    fn render(&self, view: &GridView) {
        *self.view.lock().unwrap() = Some(view.clone());
    }
}

fn records() -> Vec<Record> {
    serde_json::from_str(
        r#"[
            {"name": "A", "amount": 10, "rate": 12.5, "due": "2024-03-05", "customer:city": "Oslo"},
            {"name": "B", "amount": -5, "rate": 7, "due": "2024-04-01", "customer:city": "Bergen"},
            {"name": "C", "amount": 3, "rate": null, "due": null, "status": "Open"}
        ]"#,
    )
    .unwrap()
}

fn columns() -> ColumnModel {
    ColumnModel::new([
        Column::row_index(),
        Column::new("name", "Name"),
        Column::new("amount", "Amount").field_type(FieldType::Number),
        Column::new("rate", "Rate").field_type(FieldType::Percent),
        Column::new("due", "Due").field_type(FieldType::Date),
        Column::new("customer:city", "City"),
    ])
}

async fn grid(config: GridConfig) -> (Grid, LastView) {
    init_logging();
    let source = Arc::new(InMemorySource::new(records()));
    let context = Arc::new(DataSourceContext::new(source, "invoice"));
    let renderer = LastView::default();
    let grid = Grid::new(context, columns(), renderer.clone(), config);
    grid.refresh().await.unwrap();
    (grid, renderer)
}

fn names(view: &GridView) -> Vec<String> {
    view.rows()
        .iter()
        .map(|row| row.content(1).map(Value::to_text).unwrap_or_default())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_comparator_filter_hides_rows() {
    let (grid, renderer) = grid(GridConfig::default()).await;

    assert!(grid.set_filter(2, ">0").await.unwrap());

    let view = renderer.view.lock().unwrap().clone().unwrap();
    assert_eq!(names(&view), vec!["A", "C"]);
}

#[tokio::test(start_paused = true)]
async fn test_reapplying_a_filter_changes_nothing() {
    let (grid, _) = grid(GridConfig::default()).await;

    grid.set_filter(2, ">0").await.unwrap();
    let first = names(&grid.view().await);
    grid.apply_filters().await.unwrap();

    assert_eq!(names(&grid.view().await), first);
}

#[tokio::test(start_paused = true)]
async fn test_no_filters_show_every_row() {
    let (grid, _) = grid(GridConfig::default()).await;
    assert_eq!(names(&grid.view().await), vec!["A", "B", "C"]);

    grid.set_filter(1, "b").await.unwrap();
    grid.clear_filters().await.unwrap();
    assert_eq!(names(&grid.view().await), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_descending_sort_reverses_ascending() {
    let (grid, _) = grid(GridConfig::default()).await;

    grid.sort_column(2, SortOrder::Asc).await.unwrap();
    let mut asc = names(&grid.view().await);
    grid.sort_column(2, SortOrder::Desc).await.unwrap();

    asc.reverse();
    assert_eq!(names(&grid.view().await), asc);
}

#[tokio::test(start_paused = true)]
async fn test_no_match_renders_empty_state() {
    let (grid, _) = grid(GridConfig::default().with_no_data_message("Nothing here")).await;

    grid.set_filter(1, "zzz").await.unwrap();

    match grid.view().await {
        GridView::Empty { message } => assert_eq!(message, "Nothing here"),
        other => panic!("expected empty view, got {} rows", other.rows().len()),
    }
}

#[tokio::test(start_paused = true)]
async fn test_rejected_percent_keyword_shows_nothing() {
    let (grid, _) = grid(GridConfig::default()).await;

    grid.set_filter(3, "high").await.unwrap();
    assert!(grid.view().await.is_empty());

    grid.set_filter(3, "12.5").await.unwrap();
    assert_eq!(names(&grid.view().await), vec!["A"]);
}

#[tokio::test(start_paused = true)]
async fn test_date_and_related_filters() {
    let (grid, _) = grid(GridConfig::default()).await;

    grid.set_filter(4, "05-03-2024").await.unwrap();
    assert_eq!(names(&grid.view().await), vec!["A"]);

    grid.set_filter(4, "").await.unwrap();
    grid.set_filter(5, "berg").await.unwrap();
    assert_eq!(names(&grid.view().await), vec!["B"]);
}

#[tokio::test]
async fn test_sort_then_row_numbers_follow_position() {
    let (grid, _) = grid(GridConfig::default()).await;

    grid.sort_column(2, SortOrder::Asc).await.unwrap();

    let view = grid.view().await;
    assert_eq!(names(&view), vec!["B", "C", "A"]);
    let positions: Vec<usize> = view.rows().iter().map(|r| r.meta.row_index).collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_total_row_follows_shown_rows() {
    let (grid, _) = grid(GridConfig::default().with_total_row(true)).await;

    let GridView::Rows { total_row: Some(total), .. } = grid.view().await else {
        panic!("expected a total row");
    };
    assert!(total.is_total_row);
    assert_eq!(total.content(0), Some(&Value::String(String::new())));
    assert_eq!(total.content(2), Some(&Value::Int(8)));
    assert_eq!(total.content(3), Some(&Value::Float(19.5)));

    grid.set_filter(2, ">0").await.unwrap();
    let GridView::Rows { total_row: Some(total), .. } = grid.view().await else {
        panic!("expected a total row");
    };
    assert_eq!(total.content(2), Some(&Value::Int(13)));
}

#[tokio::test]
async fn test_remove_column_keeps_dense_indices() {
    let (grid, _) = grid(GridConfig::default()).await;

    grid.remove_column(2).await.unwrap();

    let columns = grid.columns().await;
    let indices: Vec<usize> = columns.iter().map(|c| c.col_index()).collect();
    assert_eq!(indices, (0..columns.len()).collect::<Vec<_>>());
    assert_eq!(columns.get(2).map(|c| c.id.as_str()), Some("rate"));

    let row = grid.row_at(0).await.unwrap();
    assert_eq!(row.len(), columns.len());
}

#[tokio::test]
async fn test_resize_respects_minimum() {
    let (grid, _) = grid(GridConfig::default().with_minimum_column_width(40)).await;

    assert!(!grid.set_column_width(1, 35).await.unwrap());
    assert!(grid.set_column_width(1, 200).await.unwrap());
    assert_eq!(grid.columns().await.get(1).map(|c| c.width), Some(200));
}
