//! In-memory pipeline graph: nodes, edges and immutable snapshots of both.
//!
//! The record shapes match what the editor persists into a workspace file, so a
//! [`Graph`] can be loaded from and written back to that format unchanged.

use crate::layout::{Direction, layout};
use crate::lineage::{LineageResult, trace_node_data_source};
use crate::schema::NodeKind;
use crate::validation::{ValidationResult, validate_flow};
use crate::workspace::FileMetaProvider;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod config;
pub mod cycle;
mod edit;

pub use config::*;

/// A point on the editor canvas (top-left corner of the node box).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Side of the node box where a connection handle is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// The `data` payload of a node record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(flatten)]
    pub config: NodeConfig,
    /// Last preview/execution result, kept opaque.
    #[serde(rename = "testResult", default, skip_serializing_if = "Option::is_none")]
    pub last_result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Renderer type string; mirrors the kind tag for nodes created by the editor.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub render_type: Option<String>,
    #[serde(default)]
    pub position: Position,
    pub data: NodeData,
    #[serde(rename = "sourcePosition", default, skip_serializing_if = "Option::is_none")]
    pub source_side: Option<HandleSide>,
    #[serde(rename = "targetPosition", default, skip_serializing_if = "Option::is_none")]
    pub target_side: Option<HandleSide>,
    /// Renderer fields this crate does not interpret (size, selection, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// Creates a node of `kind` with its initial configuration.
    pub fn new(id: impl Into<String>, kind: NodeKind, position: Position) -> Self {
        Self::with_config(id, NodeConfig::initial(kind), position)
    }

    pub fn with_config(id: impl Into<String>, config: NodeConfig, position: Position) -> Self {
        let id = id.into();
        let kind = config.kind();
        Self {
            render_type: Some(kind.tag().to_string()),
            position,
            data: NodeData {
                id: Some(id.clone()),
                label: kind.display_name().to_string(),
                config,
                last_result: None,
                error: None,
            },
            id,
            source_side: None,
            target_side: None,
            extra: Map::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.data.config.kind()
    }

    pub fn config(&self) -> &NodeConfig {
        &self.data.config
    }

    /// The label used in messages; falls back to the id when the label is blank.
    pub fn label(&self) -> &str {
        if self.data.label.trim().is_empty() {
            &self.id
        } else {
            &self.data.label
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.data.label = label.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(rename = "sourceHandle", default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(rename = "targetHandle", default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Edge {
    /// A handle-less edge with a deterministic id derived from its endpoints.
    pub fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: Some(format!("edge-{}-{}", source, target)),
            source,
            target,
            source_handle: None,
            target_handle: None,
            extra: Map::new(),
        }
    }

    pub fn connects(&self, source: &str, target: &str) -> bool {
        self.source == source && self.target == target
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// A snapshot of the pipeline: every operation in this crate reads one of these
/// (or the equivalent node and edge slices) and never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        find_node(&self.nodes, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn inputs_of<'g>(&'g self, id: &'g str) -> impl Iterator<Item = &'g Edge> {
        self.edges.iter().filter(move |e| e.target == id)
    }

    pub fn outputs_of<'g>(&'g self, id: &'g str) -> impl Iterator<Item = &'g Edge> {
        self.edges.iter().filter(move |e| e.source == id)
    }

    pub fn validate(&self) -> ValidationResult {
        validate_flow(&self.nodes, &self.edges)
    }

    pub fn has_cycle(&self) -> bool {
        cycle::has_cycle(&self.nodes, &self.edges)
    }

    pub fn lineage<F>(&self, node_id: &str, files: &F) -> Option<LineageResult>
    where
        F: FileMetaProvider + ?Sized,
    {
        trace_node_data_source(node_id, &self.nodes, &self.edges, files)
    }

    /// This graph with every node placed by the default layout.
    pub fn laid_out(&self, direction: Direction) -> Graph {
        Graph {
            nodes: layout(&self.nodes, &self.edges, direction),
            edges: self.edges.clone(),
        }
    }
}

pub(crate) fn find_node<'a>(nodes: &'a [Node], id: &str) -> Option<&'a Node> {
    nodes.iter().find(|n| n.id == id)
}

/// Successor and predecessor lists keyed by node id, in edge order.
pub(crate) struct Adjacency<'a> {
    successors: AHashMap<&'a str, Vec<&'a str>>,
    predecessors: AHashMap<&'a str, Vec<&'a str>>,
}

impl<'a> Adjacency<'a> {
    pub(crate) fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut successors: AHashMap<&'a str, Vec<&'a str>> = AHashMap::new();
        let mut predecessors: AHashMap<&'a str, Vec<&'a str>> = AHashMap::new();
        for (source, target) in pairs {
            successors.entry(source).or_default().push(target);
            predecessors.entry(target).or_default().push(source);
        }
        Self {
            successors,
            predecessors,
        }
    }

    pub(crate) fn from_edges(edges: &'a [Edge]) -> Self {
        Self::from_pairs(edge_pairs(edges))
    }

    pub(crate) fn successors(&self, id: &str) -> &[&'a str] {
        self.successors.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn predecessors(&self, id: &str) -> &[&'a str] {
        self.predecessors.get(id).map(Vec::as_slice).unwrap_or_default()
    }
}

pub(crate) fn edge_pairs(edges: &[Edge]) -> impl Iterator<Item = (&str, &str)> + Clone {
    edges.iter().map(|e| (e.source.as_str(), e.target.as_str()))
}
