//! Common test utilities for building pipeline graphs and file registries.
use sheetflow::prelude::*;
use sheetflow::graph::RowFilterConfig;

#[allow(dead_code)]
pub fn node(id: &str, kind: NodeKind) -> Node {
    Node::new(id, kind, Position::default())
}

#[allow(dead_code)]
pub fn edge(source: &str, target: &str) -> Edge {
    Edge::between(source, target)
}

/// A sheet selector pinned to `sheet` of `file_id`.
#[allow(dead_code)]
pub fn manual_selector(id: &str, file_id: &str, sheet: &str) -> Node {
    let config = NodeConfig::SheetSelector(SheetSelectorConfig {
        target_file_id: Some(file_id.to_string()),
        mode: SheetMode::Manual,
        manual_sheet_name: Some(sheet.to_string()),
    });
    Node::with_config(id, config, Position::default())
}

/// A sheet selector resolving its sheet from the index value at run time.
#[allow(dead_code)]
pub fn auto_selector(id: &str, file_id: &str) -> Node {
    let config = NodeConfig::SheetSelector(SheetSelectorConfig {
        target_file_id: Some(file_id.to_string()),
        mode: SheetMode::AutoByIndex,
        manual_sheet_name: None,
    });
    Node::with_config(id, config, Position::default())
}

#[allow(dead_code)]
pub fn row_filter(id: &str) -> Node {
    Node::with_config(id, NodeConfig::RowFilter(RowFilterConfig::default()), Position::default())
}

/// `src → sel → out` with a manual selector on sheet "Q1" of file "F".
#[allow(dead_code)]
pub fn create_simple_chain() -> Graph {
    Graph::new(
        vec![
            node("src", NodeKind::Source),
            manual_selector("sel", "F", "Q1"),
            node("out", NodeKind::Output),
        ],
        vec![edge("src", "sel"), edge("sel", "out")],
    )
}

/// `src → sel → filter → agg → out`.
#[allow(dead_code)]
pub fn create_full_chain() -> Graph {
    Graph::new(
        vec![
            node("src", NodeKind::Source),
            manual_selector("sel", "F", "Q1"),
            row_filter("filter"),
            node("agg", NodeKind::Aggregator),
            node("out", NodeKind::Output),
        ],
        vec![
            edge("src", "sel"),
            edge("sel", "filter"),
            edge("filter", "agg"),
            edge("agg", "out"),
        ],
    )
}

/// File "F" with sheets Q1 (header row 2) and Q2 (header row 0), and file "G"
/// without sheet metadata.
#[allow(dead_code)]
pub fn create_file_registry() -> Vec<FileMeta> {
    vec![
        FileMeta::new(
            "F",
            "/data/finance.xlsx",
            vec![SheetMeta::new("Q1", 2), SheetMeta::new("Q2", 0)],
        ),
        FileMeta::new("G", "/data/empty.xlsx", vec![]),
    ]
}

#[allow(dead_code)]
pub fn table(columns: &[&str], rows: Vec<Vec<serde_json::Value>>) -> Table {
    Table::new(columns.iter().map(|c| c.to_string()).collect(), rows)
}
