//! Tests for result normalization and the external service helpers.
mod common;
use ahash::AHashMap;
use common::*;
use serde_json::json;
use sheetflow::preview::{normalize, table_to_sheet};
use sheetflow::prelude::*;
use sheetflow::service::{execute_node, preview_node};
use std::cell::RefCell;

fn rows(n: usize) -> Vec<Vec<serde_json::Value>> {
    (0..n).map(|i| vec![json!(i), json!(format!("row {}", i))]).collect()
}

#[test]
fn test_branch_errors_are_joined() {
    let records = vec![
        BranchRecord::table(table(&["a"], rows(1))),
        BranchRecord::failed("file missing"),
        BranchRecord::failed("sheet locked"),
    ];
    let result = normalize("n", NodeKind::RowFilter, &records);
    assert_eq!(result.error.as_deref(), Some("file missing; sheet locked"));
    assert!(result.display_data.is_none());
    assert!(result.is_error());
    assert_eq!(result.raw, records);
}

#[test]
fn test_source_and_aggregator_pass_first_table_through() {
    let records = vec![
        BranchRecord::table(table(&["total"], vec![vec![json!(42)]])),
        BranchRecord::table(table(&["ignored"], vec![])),
    ];
    for kind in [NodeKind::Source, NodeKind::Aggregator] {
        let result = normalize("n", kind, &records);
        let display = result.display_data.expect("table");
        assert!(display.is_table());
        assert_eq!(display.as_table().unwrap().columns, vec!["total".to_string()]);
    }

    let empty = normalize("n", NodeKind::Aggregator, &[]);
    assert_eq!(empty.display_data, Some(DisplayData::Table(Table::default())));
}

#[test]
fn test_selector_fans_out_into_named_sheets() {
    let records = vec![
        BranchRecord::table(table(&["id", "name"], rows(25))),
        BranchRecord::empty(),
        BranchRecord::table(table(&["id", "name"], rows(3))),
    ];
    let result = normalize("sel", NodeKind::SheetSelector, &records);
    let display = result.display_data.expect("sheets");
    assert!(display.is_multi_sheet());
    let sheets = display.as_sheets().unwrap();
    assert_eq!(
        sheets.iter().map(|s| s.sheet_name.as_str()).collect::<Vec<_>>(),
        vec!["Sheet 1", "Sheet 2", "Sheet 3"]
    );
    assert_eq!(sheets[0].data.len(), 10);
    assert!(sheets[1].columns.is_empty() && sheets[1].data.is_empty());
    assert_eq!(sheets[2].data.len(), 3);
}

#[test]
fn test_preview_row_limit_is_configurable() {
    let records = vec![BranchRecord::table(table(&["id", "name"], rows(25)))];
    let normalizer = ResultNormalizer::new().with_sheet_preview_rows(4);
    let result = normalizer.normalize("sel", NodeKind::SheetSelector, &records);
    assert_eq!(result.display_data.unwrap().as_sheets().unwrap()[0].data.len(), 4);
}

#[test]
fn test_empty_sheet_list_is_not_multi_sheet() {
    let result = normalize("sel", NodeKind::SheetSelector, &[]);
    let display = result.display_data.expect("sheets");
    assert!(!display.is_multi_sheet());
    assert!(!display.is_table());
}

#[test]
fn test_filter_and_lookup_concatenate_branches() {
    let records = vec![
        BranchRecord::empty(),
        BranchRecord::table(table(&["id", "name"], rows(2))),
        BranchRecord::table(table(&["other", "header"], rows(3))),
    ];
    for kind in [NodeKind::RowFilter, NodeKind::RowLookup] {
        let result = normalize("n", kind, &records);
        let merged = result.display_data.expect("table");
        let merged = merged.as_table().unwrap();
        assert_eq!(merged.columns, vec!["id".to_string(), "name".to_string()]);
        assert_eq!(merged.rows.len(), 5);
    }
}

#[test]
fn test_output_without_rows_is_no_data() {
    let result = normalize("out", NodeKind::Output, &[]);
    assert!(result.has_no_data());

    let result = normalize("out", NodeKind::Output, &[BranchRecord::empty()]);
    assert!(result.has_no_data());

    let result = normalize("out", NodeKind::Output, &[BranchRecord::table(Table::default())]);
    assert!(result.has_no_data());

    let records = vec![BranchRecord::table(table(&["total"], vec![vec![json!(7)]]))];
    let result = normalize("out", NodeKind::Output, &records);
    assert!(!result.has_no_data());
    assert_eq!(result.display_data.unwrap().as_table().unwrap().rows, vec![vec![json!(7)]]);
}

#[test]
fn test_branch_records_parse_service_payload() {
    let payload = json!([
        {
            "node_id": "agg",
            "node_type": "aggregator",
            "success": true,
            "execution_time_ms": 12,
            "result_data": { "columns": ["sum"], "data": [[10.5]], "total_rows": 1 },
            "error": null
        }
    ]);
    let records: Vec<BranchRecord> = serde_json::from_value(payload).unwrap();
    assert_eq!(records[0].execution_time_ms, Some(12));
    assert_eq!(records[0].table.as_ref().unwrap().total_rows, Some(1));
    assert!(records[0].error.is_none());
}

#[test]
fn test_display_data_serializes_to_either_shape() {
    let table = DisplayData::Table(table(&["a"], vec![vec![json!(1)]]));
    assert_eq!(serde_json::to_value(&table).unwrap(), json!({ "columns": ["a"], "data": [[1]] }));

    let sheets = DisplayData::Sheets(vec![table_to_sheet(&Table::new(vec!["a".to_string()], vec![]))]);
    assert_eq!(
        serde_json::to_value(&sheets).unwrap(),
        json!([{ "sheet_name": "Sheet1", "columns": ["a"], "data": [] }])
    );
}

#[test]
fn test_normalize_all() {
    let mut results = AHashMap::new();
    results.insert("b-filter".to_string(), vec![BranchRecord::table(table(&["x"], rows(1)))]);
    results.insert("a-agg".to_string(), vec![BranchRecord::failed("boom")]);
    results.insert("unknown".to_string(), vec![BranchRecord::empty()]);
    let mut kinds = AHashMap::new();
    kinds.insert("b-filter".to_string(), NodeKind::RowFilter);
    kinds.insert("a-agg".to_string(), NodeKind::Aggregator);

    let normalized = ResultNormalizer::default().normalize_all(&results, &kinds);
    assert_eq!(normalized.len(), 2);
    assert_eq!(normalized[0].node_id, "a-agg");
    assert_eq!(normalized[0].error.as_deref(), Some("boom"));
    assert_eq!(normalized[1].node_kind, NodeKind::RowFilter);
}

struct FakePipeline {
    records: Vec<BranchRecord>,
    fail: bool,
    calls: RefCell<Vec<(String, Option<usize>)>>,
}

impl PipelineService for FakePipeline {
    fn preview_node(&self, node_id: &str, max_rows: usize, _graph: &Graph) -> Result<Vec<BranchRecord>, ServiceError> {
        self.calls.borrow_mut().push((node_id.to_string(), Some(max_rows)));
        if self.fail {
            return Err(ServiceError::Failed("engine offline".to_string()));
        }
        Ok(self.records.clone())
    }

    fn execute_node(&self, node_id: &str, _graph: &Graph) -> Result<Vec<BranchRecord>, ServiceError> {
        self.calls.borrow_mut().push((node_id.to_string(), None));
        if self.fail {
            return Err(ServiceError::Failed("engine offline".to_string()));
        }
        Ok(self.records.clone())
    }
}

#[test]
fn test_preview_and_execute_helpers() {
    let graph = create_full_chain();
    let service = FakePipeline {
        records: vec![BranchRecord::table(table(&["sum"], vec![vec![json!(3)]]))],
        fail: false,
        calls: RefCell::new(Vec::new()),
    };
    let normalizer = ResultNormalizer::default();

    let previewed = preview_node(&service, &normalizer, "agg", 20, &graph).unwrap();
    assert_eq!(previewed.node_kind, NodeKind::Aggregator);
    assert!(previewed.display_data.unwrap().is_table());

    let executed = execute_node(&service, &normalizer, "out", &graph).unwrap();
    assert_eq!(executed.node_kind, NodeKind::Output);
    assert!(!executed.has_no_data());

    assert_eq!(
        *service.calls.borrow(),
        vec![("agg".to_string(), Some(20)), ("out".to_string(), None)]
    );

    let err = execute_node(&service, &normalizer, "ghost", &graph).unwrap_err();
    assert_eq!(err, ServiceError::UnknownNode("ghost".to_string()));
}

#[test]
fn test_service_failure_becomes_result_error() {
    let graph = create_full_chain();
    let service = FakePipeline {
        records: vec![],
        fail: true,
        calls: RefCell::new(Vec::new()),
    };
    let result = preview_node(&service, &ResultNormalizer::default(), "filter", 5, &graph).unwrap();
    assert_eq!(result.error.as_deref(), Some("engine offline"));
    assert!(result.display_data.is_none());
}

struct FakeReader;

impl HeaderRowReader for FakeReader {
    fn read_header_row(&self, file_path: &str, sheet_name: &str, header_row: usize) -> Result<Vec<String>, ServiceError> {
        if file_path.is_empty() {
            return Err(ServiceError::Failed("no path".to_string()));
        }
        Ok(vec![format!("{}@{}", sheet_name, header_row)])
    }
}

#[test]
fn test_resolve_columns() {
    let files = create_file_registry();
    let graph = create_full_chain();
    assert_eq!(
        resolve_columns("agg", &graph, &files, &FakeReader).unwrap(),
        vec!["Q1@2".to_string()]
    );

    // No lineage: nothing to read.
    let orphan = Graph::new(vec![node("agg", NodeKind::Aggregator)], vec![]);
    assert!(resolve_columns("agg", &orphan, &files, &FakeReader).unwrap().is_empty());

    // File without sheet metadata.
    let graph = Graph::new(
        vec![node("src", NodeKind::Source), auto_selector("sel", "G")],
        vec![edge("src", "sel")],
    );
    assert!(resolve_columns("sel", &graph, &files, &FakeReader).unwrap().is_empty());
}
