//! Prelude module for convenient imports
//!
//! Re-exports the types most callers need to load a workspace, edit and
//! validate its graph, resolve lineage and lay it out.
//!
//! # Example
//!
//! ```rust,no_run
//! use sheetflow::prelude::*;
//!
//! # fn run_example() -> Result<(), Box<dyn std::error::Error>> {
//! let workspace = Workspace::from_file("path/to/workspace.json")?;
//! let graph = workspace.graph();
//!
//! let result = validate_flow(&graph.nodes, &graph.edges);
//! println!("{}", ReportFormatter::format(&result));
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::graph::{
    AggregationMethod, Edge, Graph, HandleSide, Node, NodeConfig, NodeData, Position, SheetMode,
    SheetSelectorConfig, SourceConfig,
};
pub use crate::schema::{IoLimits, NodeKind};

// Validation
pub use crate::graph::cycle::{find_cycle, has_cycle, would_create_cycle};
pub use crate::validation::{
    FlowError, FlowWarning, ValidationResult, available_successor_kinds, is_valid_connection,
    validate_connection, validate_flow,
};

// Lineage and layout
pub use crate::layout::{AutoLayout, Direction, LayoutConfig, LayoutEngine, layout};
pub use crate::lineage::{LineageResult, SheetResolution, trace_node_data_source};

// Results and external services
pub use crate::preview::{BranchRecord, DisplayData, NamedSheet, NormalizedResult, ResultNormalizer, Table};
pub use crate::service::{HeaderRowReader, PipelineService, resolve_columns};
pub use crate::workspace::{FileMeta, FileMetaProvider, SheetMeta, Workspace};

// Error types
pub use crate::error::{ConnectionError, EditError, LayoutError, ServiceError, WorkspaceError};

// Formatting
pub use crate::report::ReportFormatter;
