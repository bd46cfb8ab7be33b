use crate::schema::NodeKind;
use serde::{Deserialize, Serialize};

/// Kind-specific configuration carried by every node.
///
/// The `nodeType` tag doubles as the node's [`NodeKind`], so a node can never
/// hold a payload that disagrees with its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "nodeType")]
pub enum NodeConfig {
    #[serde(rename = "indexSource")]
    Source(SourceConfig),
    #[serde(rename = "sheetSelector")]
    SheetSelector(SheetSelectorConfig),
    #[serde(rename = "rowFilter")]
    RowFilter(RowFilterConfig),
    #[serde(rename = "rowLookup")]
    RowLookup(RowLookupConfig),
    #[serde(rename = "aggregator")]
    Aggregator(AggregatorConfig),
    #[serde(rename = "output")]
    Output(OutputConfig),
}

impl NodeConfig {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeConfig::Source(_) => NodeKind::Source,
            NodeConfig::SheetSelector(_) => NodeKind::SheetSelector,
            NodeConfig::RowFilter(_) => NodeKind::RowFilter,
            NodeConfig::RowLookup(_) => NodeKind::RowLookup,
            NodeConfig::Aggregator(_) => NodeKind::Aggregator,
            NodeConfig::Output(_) => NodeKind::Output,
        }
    }

    /// The configuration a freshly inserted node of `kind` starts with.
    pub fn initial(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Source => NodeConfig::Source(SourceConfig {
                by_column: Some(true),
                by_sheet_name: Some(false),
                column_name: Some(String::new()),
                ..SourceConfig::default()
            }),
            NodeKind::SheetSelector => NodeConfig::SheetSelector(SheetSelectorConfig::default()),
            NodeKind::RowFilter => NodeConfig::RowFilter(RowFilterConfig::default()),
            NodeKind::RowLookup => NodeConfig::RowLookup(RowLookupConfig::default()),
            NodeKind::Aggregator => NodeConfig::Aggregator(AggregatorConfig {
                output_as: Some(String::new()),
                ..AggregatorConfig::default()
            }),
            NodeKind::Output => NodeConfig::Output(OutputConfig {
                output_format: Some(OutputFormat::Table),
                output_path: None,
            }),
        }
    }

    pub fn as_source(&self) -> Option<&SourceConfig> {
        match self {
            NodeConfig::Source(cfg) => Some(cfg),
            _ => None,
        }
    }

    pub fn as_sheet_selector(&self) -> Option<&SheetSelectorConfig> {
        match self {
            NodeConfig::SheetSelector(cfg) => Some(cfg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(rename = "sourceFileID", default, skip_serializing_if = "Option::is_none")]
    pub source_file_id: Option<String>,
    #[serde(rename = "bySheetName", default, skip_serializing_if = "Option::is_none")]
    pub by_sheet_name: Option<bool>,
    #[serde(rename = "sheetName", default, skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,
    #[serde(rename = "byColumn", default, skip_serializing_if = "Option::is_none")]
    pub by_column: Option<bool>,
    #[serde(rename = "columnName", default, skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
}

/// How a sheet selector maps index values to a concrete sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetMode {
    /// The index value itself names the sheet; only known at execution time.
    #[default]
    #[serde(rename = "auto_by_index")]
    AutoByIndex,
    #[serde(rename = "manual")]
    Manual,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetSelectorConfig {
    #[serde(rename = "targetFileID", default, skip_serializing_if = "Option::is_none")]
    pub target_file_id: Option<String>,
    #[serde(default)]
    pub mode: SheetMode,
    #[serde(rename = "manualSheetName", default, skip_serializing_if = "Option::is_none")]
    pub manual_sheet_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionLogic {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub column: String,
    pub operator: String,
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<ConditionLogic>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowFilterConfig {
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowLookupConfig {
    #[serde(rename = "matchColumn", default, skip_serializing_if = "Option::is_none")]
    pub match_column: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMethod {
    #[default]
    Sum,
    #[serde(alias = "average")]
    Avg,
    Count,
    Min,
    Max,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    #[serde(rename = "statColumn", default, skip_serializing_if = "Option::is_none")]
    pub stat_column: Option<String>,
    #[serde(default)]
    pub method: AggregationMethod,
    #[serde(rename = "outputAs", default, skip_serializing_if = "Option::is_none")]
    pub output_as: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Csv,
    Excel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "outputFormat", default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,
    #[serde(rename = "outputPath", default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}
