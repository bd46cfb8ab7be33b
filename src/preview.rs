//! Shaping raw per-branch execution records into something a result panel can
//! draw.
//!
//! The execution service evaluates a node once per branch (typically once per
//! index value) and returns one [`BranchRecord`] per evaluation. How those
//! branches are combined depends on the node kind; consumers only look at the
//! resulting [`DisplayData`] shape.

use crate::schema::NodeKind;
use ahash::AHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rows kept per sheet when a selector's branches are fanned out.
pub const DEFAULT_SHEET_PREVIEW_ROWS: usize = 10;

/// One cell of a result table.
pub type Cell = Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(rename = "data", default)]
    pub rows: Vec<Vec<Cell>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<usize>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            columns,
            rows,
            total_rows: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}

/// One branch of a node evaluation as returned by the execution service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(rename = "result_data", default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl BranchRecord {
    pub fn table(table: Table) -> Self {
        Self {
            table: Some(table),
            ..Self::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// A branch that ran but produced nothing.
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedSheet {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub data: Vec<Vec<Cell>>,
}

/// What a result panel renders: one table, or several named sheets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayData {
    Sheets(Vec<NamedSheet>),
    Table(Table),
}

impl DisplayData {
    /// True only for a non-empty sheet list.
    pub fn is_multi_sheet(&self) -> bool {
        matches!(self, DisplayData::Sheets(sheets) if !sheets.is_empty())
    }

    pub fn is_table(&self) -> bool {
        matches!(self, DisplayData::Table(_))
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            DisplayData::Table(table) => Some(table),
            DisplayData::Sheets(_) => None,
        }
    }

    pub fn as_sheets(&self) -> Option<&[NamedSheet]> {
        match self {
            DisplayData::Sheets(sheets) => Some(sheets),
            DisplayData::Table(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedResult {
    pub node_id: String,
    pub node_kind: NodeKind,
    pub display_data: Option<DisplayData>,
    pub error: Option<String>,
    /// The records this result was built from, untouched.
    pub raw: Vec<BranchRecord>,
}

impl NormalizedResult {
    /// Nothing to show and nothing went wrong (an output node that produced no
    /// rows yet).
    pub fn has_no_data(&self) -> bool {
        self.display_data.is_none() && self.error.is_none()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub(crate) fn failed(node_id: &str, node_kind: NodeKind, error: String) -> Self {
        Self {
            node_id: node_id.to_string(),
            node_kind,
            display_data: None,
            error: Some(error),
            raw: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResultNormalizer {
    sheet_preview_rows: usize,
}

impl Default for ResultNormalizer {
    fn default() -> Self {
        Self {
            sheet_preview_rows: DEFAULT_SHEET_PREVIEW_ROWS,
        }
    }
}

impl ResultNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet_preview_rows(mut self, rows: usize) -> Self {
        self.sheet_preview_rows = rows;
        self
    }

    pub fn sheet_preview_rows(&self) -> usize {
        self.sheet_preview_rows
    }

    pub fn normalize(&self, node_id: &str, node_kind: NodeKind, records: &[BranchRecord]) -> NormalizedResult {
        let errors: Vec<&str> = records.iter().filter_map(|r| r.error.as_deref()).collect();
        let (display_data, error) = if errors.is_empty() {
            (self.display_for(node_kind, records), None)
        } else {
            tracing::debug!(node_id, failed = errors.len(), branches = records.len(), "branches failed");
            (None, Some(errors.iter().join("; ")))
        };

        NormalizedResult {
            node_id: node_id.to_string(),
            node_kind,
            display_data,
            error,
            raw: records.to_vec(),
        }
    }

    /// Normalizes every node of a batch result. Nodes missing from `kinds` are
    /// skipped; the output is ordered by node id.
    pub fn normalize_all(
        &self,
        results: &AHashMap<String, Vec<BranchRecord>>,
        kinds: &AHashMap<String, NodeKind>,
    ) -> Vec<NormalizedResult> {
        results
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .filter_map(|(node_id, records)| {
                let Some(&kind) = kinds.get(node_id) else {
                    tracing::warn!(node_id = %node_id, "no kind known for result, skipped");
                    return None;
                };
                Some(self.normalize(node_id, kind, records))
            })
            .collect()
    }

    fn display_for(&self, node_kind: NodeKind, records: &[BranchRecord]) -> Option<DisplayData> {
        match node_kind {
            NodeKind::Source | NodeKind::Aggregator => {
                let table = records.first().and_then(|r| r.table.clone()).unwrap_or_default();
                Some(DisplayData::Table(strip_total(table)))
            }
            NodeKind::SheetSelector => Some(DisplayData::Sheets(
                records
                    .iter()
                    .enumerate()
                    .map(|(i, record)| self.branch_sheet(i, record))
                    .collect(),
            )),
            NodeKind::RowFilter | NodeKind::RowLookup => Some(DisplayData::Table(concat_tables(records))),
            NodeKind::Output => {
                let table = records.first().and_then(|r| r.table.as_ref())?;
                if table.is_empty() {
                    None
                } else {
                    Some(DisplayData::Table(strip_total(table.clone())))
                }
            }
        }
    }

    fn branch_sheet(&self, index: usize, record: &BranchRecord) -> NamedSheet {
        let sheet_name = format!("Sheet {}", index + 1);
        match &record.table {
            Some(table) => NamedSheet {
                sheet_name,
                columns: table.columns.clone(),
                data: table.rows.iter().take(self.sheet_preview_rows).cloned().collect(),
            },
            None => NamedSheet {
                sheet_name,
                ..NamedSheet::default()
            },
        }
    }
}

fn strip_total(table: Table) -> Table {
    Table::new(table.columns, table.rows)
}

/// All branch rows under the first non-empty header.
fn concat_tables(records: &[BranchRecord]) -> Table {
    let mut merged = Table::default();
    for table in records.iter().filter_map(|r| r.table.as_ref()) {
        if merged.columns.is_empty() {
            merged.columns = table.columns.clone();
        }
        merged.rows.extend(table.rows.iter().cloned());
    }
    merged
}

/// Normalizes with default settings.
pub fn normalize(node_id: &str, node_kind: NodeKind, records: &[BranchRecord]) -> NormalizedResult {
    ResultNormalizer::default().normalize(node_id, node_kind, records)
}

/// A single table as a one-sheet list, for renderers that only draw sheets.
pub fn table_to_sheet(table: &Table) -> NamedSheet {
    NamedSheet {
        sheet_name: "Sheet1".to_string(),
        columns: table.columns.clone(),
        data: table.rows.clone(),
    }
}
