use crate::error::WorkspaceError;
use crate::graph::{Edge, Graph, Node};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;

/// Per-sheet metadata recorded when a file is added to a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetMeta {
    pub sheet_name: String,
    /// Zero-based index of the row holding the column names.
    #[serde(default)]
    pub header_row: usize,
}

/// A spreadsheet registered in the workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMeta {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub sheet_metas: Vec<SheetMeta>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FileMeta {
    pub fn new(id: impl Into<String>, path: impl Into<String>, sheets: Vec<SheetMeta>) -> Self {
        let path = path.into();
        let name = path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            id: id.into(),
            name,
            path,
            sheet_metas: sheets,
            extra: Map::new(),
        }
    }

    pub fn sheet(&self, sheet_name: &str) -> Option<&SheetMeta> {
        self.sheet_metas.iter().find(|s| s.sheet_name == sheet_name)
    }

    pub fn first_sheet(&self) -> Option<&SheetMeta> {
        self.sheet_metas.first()
    }
}

impl SheetMeta {
    pub fn new(sheet_name: impl Into<String>, header_row: usize) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            header_row,
        }
    }
}

/// Lookup of file metadata by file id.
///
/// Implementations must return a stable snapshot for the duration of one call
/// into this crate.
pub trait FileMetaProvider {
    fn file_meta(&self, file_id: &str) -> Option<&FileMeta>;
}

impl FileMetaProvider for [FileMeta] {
    fn file_meta(&self, file_id: &str) -> Option<&FileMeta> {
        self.iter().find(|f| f.id == file_id)
    }
}

impl FileMetaProvider for Vec<FileMeta> {
    fn file_meta(&self, file_id: &str) -> Option<&FileMeta> {
        self.as_slice().file_meta(file_id)
    }
}

impl FileMetaProvider for AHashMap<String, FileMeta> {
    fn file_meta(&self, file_id: &str) -> Option<&FileMeta> {
        self.get(file_id)
    }
}

impl FileMetaProvider for Workspace {
    fn file_meta(&self, file_id: &str) -> Option<&FileMeta> {
        self.files.file_meta(file_id)
    }
}

/// The persisted workspace document: registered files plus the flow graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub files: Vec<FileMeta>,
    #[serde(default)]
    pub flow_nodes: Vec<Node>,
    #[serde(default)]
    pub flow_edges: Vec<Edge>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Workspace {
    pub fn from_json(json: &str) -> Result<Self, WorkspaceError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, WorkspaceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_file(path: &str) -> Result<Self, WorkspaceError> {
        let content = fs::read_to_string(path).map_err(|source| WorkspaceError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn save(&self, path: &str) -> Result<(), WorkspaceError> {
        fs::write(path, self.to_json()?).map_err(|source| WorkspaceError::Io {
            path: path.to_string(),
            source,
        })
    }

    /// A snapshot of the flow graph.
    pub fn graph(&self) -> Graph {
        Graph::new(self.flow_nodes.clone(), self.flow_edges.clone())
    }

    /// This workspace with its flow replaced by `graph`.
    pub fn with_graph(&self, graph: Graph) -> Workspace {
        Workspace {
            flow_nodes: graph.nodes,
            flow_edges: graph.edges,
            ..self.clone()
        }
    }
}
