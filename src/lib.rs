//! # Sheetflow - Spreadsheet Pipeline Graph Engine
//!
//! **Sheetflow** is the graph core of a visual spreadsheet ETL editor. Users wire
//! typed nodes (index source, sheet selector, row filter, row lookup, aggregator,
//! output) into a directed pipeline; this crate decides which wires are legal,
//! whether the whole pipeline can run, which spreadsheet feeds any given node,
//! where nodes go on the canvas, and how raw execution results are shaped for
//! display.
//!
//! ## Core Workflow
//!
//! Every operation is a pure function of a graph snapshot:
//!
//! 1.  **Load**: Read a [`workspace::Workspace`] document (registered files plus the flow graph).
//! 2.  **Edit**: Build new snapshots with [`graph::Graph::with_edge`] and friends. Edges are accepted only if [`validation::validate_connection`] agrees.
//! 3.  **Validate**: Run [`validation::validate_flow`] after each edit for the full list of errors and warnings.
//! 4.  **Resolve**: Ask [`lineage::trace_node_data_source`] which file, sheet and header row feed a node.
//! 5.  **Arrange**: Place nodes with [`layout::layout`].
//! 6.  **Display**: Turn per-branch execution records into tables or sheet lists with [`preview::ResultNormalizer`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sheetflow::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let files = vec![FileMeta::new(
//!         "sales",
//!         "/data/sales.xlsx",
//!         vec![SheetMeta::new("Q1", 2), SheetMeta::new("Q2", 0)],
//!     )];
//!
//!     let selector = NodeConfig::SheetSelector(SheetSelectorConfig {
//!         target_file_id: Some("sales".to_string()),
//!         mode: SheetMode::Manual,
//!         manual_sheet_name: Some("Q1".to_string()),
//!     });
//!
//!     // Each edit returns a new snapshot; rejected edges surface as errors.
//!     let graph = Graph::default()
//!         .with_node(Node::new("src", NodeKind::Source, Position::new(0.0, 0.0)))?
//!         .with_node(Node::with_config("sel", selector, Position::new(300.0, 0.0)))?
//!         .with_edge(Edge::between("src", "sel"))?
//!         .with_successor("sel", NodeKind::Aggregator, "agg")?
//!         .with_successor("agg", NodeKind::Output, "out")?;
//!
//!     let report = graph.validate();
//!     println!("{}", ReportFormatter::format(&report));
//!
//!     if let Some(lineage) = graph.lineage("agg", &files) {
//!         println!(
//!             "agg reads {} / {} (header row {})",
//!             lineage.file_path, lineage.sheet_name, lineage.header_row
//!         );
//!     }
//!
//!     let arranged = graph.laid_out(Direction::LeftRight);
//!     for node in &arranged.nodes {
//!         println!("{} at ({}, {})", node.id, node.position.x, node.position.y);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod graph;
pub mod layout;
pub mod lineage;
pub mod prelude;
pub mod preview;
pub mod report;
pub mod schema;
pub mod service;
pub mod validation;
pub mod workspace;
