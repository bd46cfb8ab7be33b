use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed processing role of a pipeline node.
///
/// The serialized form is the tag the editor writes into every node record
/// (`"indexSource"`, `"sheetSelector"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "indexSource")]
    Source,
    #[serde(rename = "sheetSelector")]
    SheetSelector,
    #[serde(rename = "rowFilter")]
    RowFilter,
    #[serde(rename = "rowLookup")]
    RowLookup,
    #[serde(rename = "aggregator")]
    Aggregator,
    #[serde(rename = "output")]
    Output,
}

/// Input/output cardinality limits of a node kind.
///
/// `None` for a maximum means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoLimits {
    pub max_inputs: Option<usize>,
    pub max_outputs: Option<usize>,
    pub requires_input: bool,
    pub requires_output: bool,
}

impl IoLimits {
    /// True when the kind accepts at most one inbound edge.
    pub fn is_single_input(&self) -> bool {
        self.max_inputs == Some(1)
    }
}

impl NodeKind {
    pub const ALL: [NodeKind; 6] = [
        NodeKind::Source,
        NodeKind::SheetSelector,
        NodeKind::RowFilter,
        NodeKind::RowLookup,
        NodeKind::Aggregator,
        NodeKind::Output,
    ];

    /// Kinds permitted as a direct successor of `self`. `Output` is terminal.
    pub fn allowed_successors(self) -> &'static [NodeKind] {
        use NodeKind::*;
        match self {
            Source => &[SheetSelector],
            SheetSelector => &[Aggregator, RowLookup, RowFilter, Output],
            RowFilter => &[RowLookup, Aggregator, Output],
            RowLookup => &[Aggregator, RowFilter, Output],
            Aggregator => &[Aggregator, Output],
            Output => &[],
        }
    }

    pub fn can_connect_to(self, target: NodeKind) -> bool {
        self.allowed_successors().contains(&target)
    }

    pub fn io_limits(self) -> IoLimits {
        use NodeKind::*;
        match self {
            Source => IoLimits {
                max_inputs: Some(0),
                max_outputs: None,
                requires_input: false,
                requires_output: true,
            },
            SheetSelector => IoLimits {
                max_inputs: Some(1),
                max_outputs: None,
                requires_input: true,
                requires_output: true,
            },
            RowFilter | RowLookup => IoLimits {
                max_inputs: Some(1),
                max_outputs: None,
                requires_input: true,
                requires_output: false,
            },
            Aggregator => IoLimits {
                max_inputs: Some(1),
                max_outputs: Some(1),
                requires_input: true,
                requires_output: false,
            },
            Output => IoLimits {
                max_inputs: None,
                max_outputs: Some(0),
                requires_input: true,
                requires_output: false,
            },
        }
    }

    /// Human-readable name shown in the editor and in validation messages.
    pub fn display_name(self) -> &'static str {
        match self {
            NodeKind::Source => "Index Source",
            NodeKind::SheetSelector => "Sheet Selector",
            NodeKind::RowFilter => "Row Filter",
            NodeKind::RowLookup => "Row Lookup",
            NodeKind::Aggregator => "Aggregator",
            NodeKind::Output => "Output",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            NodeKind::Source => {
                "Which items should be counted? Pick a column of a sheet, or use the sheet names themselves as index values."
            }
            NodeKind::SheetSelector => {
                "How each index value locates a sheet: automatically when the index value is a sheet name, otherwise a manually chosen sheet."
            }
            NodeKind::RowFilter => "Keeps only the upstream rows matching the configured conditions.",
            NodeKind::RowLookup => "Keeps the rows belonging to the current index value.",
            NodeKind::Aggregator => {
                "Computes a statistic over one column of the upstream table. Chaining aggregators does not change earlier results."
            }
            NodeKind::Output => "Where results go. Every input becomes its own sheet.",
        }
    }

    /// The wire tag used in persisted workspaces.
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Source => "indexSource",
            NodeKind::SheetSelector => "sheetSelector",
            NodeKind::RowFilter => "rowFilter",
            NodeKind::RowLookup => "rowLookup",
            NodeKind::Aggregator => "aggregator",
            NodeKind::Output => "output",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
