use crate::schema::NodeKind;
use itertools::Itertools;
use thiserror::Error;

/// Why a candidate edge was refused by the connection validator.
///
/// The `Display` form is the human-readable reason shown at the gesture.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("node not found: '{0}'")]
    NodeNotFound(String),

    #[error("{source_kind} cannot connect to {target_kind} (allowed successors: {})", list_kinds(.source_kind.allowed_successors()))]
    IncompatibleKinds {
        source_kind: NodeKind,
        target_kind: NodeKind,
    },

    #[error("connection exists from '{source_id}' to '{target_id}'")]
    ConnectionExists { source_id: String, target_id: String },

    #[error("{0} accepts a single input only")]
    SingleInputOnly(NodeKind),

    #[error("cycle detected: connecting '{source_id}' to '{target_id}' would close a loop")]
    CycleDetected { source_id: String, target_id: String },
}

fn list_kinds(kinds: &[NodeKind]) -> String {
    if kinds.is_empty() {
        "none".to_string()
    } else {
        kinds.iter().join(", ")
    }
}

/// Errors from building a new graph snapshot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("node '{0}' already exists")]
    DuplicateNode(String),

    #[error("node '{0}' does not exist")]
    UnknownNode(String),

    #[error("connection rejected: {0}")]
    Rejected(#[from] ConnectionError),
}

/// Errors loading or saving a workspace document.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Failed to parse workspace JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not access workspace file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The primary layout strategy could not place the graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layered layout needs an acyclic graph, found cycle {}", .0.join(" → "))]
    Cyclic(Vec<String>),
}

/// A failure reported by an external collaborator (file reader, execution
/// service). The message is passed through unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    Failed(String),

    #[error("node '{0}' is not part of the graph")]
    UnknownNode(String),
}
