//! Upstream data-source lineage.
//!
//! A node's columns come from the spreadsheet picked by the nearest
//! (index source, sheet selector) pair above it. This module finds that pair by
//! walking the graph backwards and turns it into the concrete file, sheet and
//! header row a header-row reader needs.

use crate::graph::{Adjacency, Edge, Node, SheetMode, find_node};
use crate::schema::NodeKind;
use crate::workspace::FileMetaProvider;
use ahash::AHashSet;
use std::collections::VecDeque;

/// How trustworthy the resolved sheet name is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetResolution {
    /// The selector names its sheet explicitly.
    Exact,
    /// The selector picks sheets by index value at execution time; the first
    /// sheet of the file stands in. Its columns are representative only and
    /// are not guaranteed for every index value.
    Representative,
}

/// The (source, selector) node pair feeding a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineagePath {
    pub source_id: String,
    pub selector_id: String,
}

/// The concrete spreadsheet location feeding a node. Derived on demand and
/// never stored: any upstream edit or file metadata change makes it stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageResult {
    pub file_id: String,
    pub file_path: String,
    pub sheet_name: String,
    pub header_row: usize,
    pub resolution: SheetResolution,
    pub path: LineagePath,
}

/// Arguments for a header-row read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRequest<'a> {
    pub file_path: &'a str,
    pub sheet_name: &'a str,
    pub header_row: usize,
}

impl LineageResult {
    /// False when the file has no sheet metadata; callers must then treat the
    /// node as having no known columns.
    pub fn is_usable(&self) -> bool {
        !self.sheet_name.is_empty()
    }

    pub fn is_exact(&self) -> bool {
        self.resolution == SheetResolution::Exact
    }

    pub fn header_request(&self) -> HeaderRequest<'_> {
        HeaderRequest {
            file_path: &self.file_path,
            sheet_name: &self.sheet_name,
            header_row: self.header_row,
        }
    }
}

/// Finds the nearest (source, selector) pair upstream of `node_id`.
///
/// Breadth-first over the reverse graph, carrying the path walked so far. The
/// search stops at the first Source reached; the selector is the one on that
/// path closest to the Source. A Source reached without a selector on its path
/// ends the search unresolved.
pub fn find_lineage_path(node_id: &str, nodes: &[Node], edges: &[Edge]) -> Option<LineagePath> {
    let reverse = Adjacency::from_edges(edges);
    let mut visited: AHashSet<&str> = AHashSet::new();
    let mut queue: VecDeque<(&str, Vec<&str>)> = VecDeque::new();
    queue.push_back((node_id, vec![node_id]));

    while let Some((current, path)) = queue.pop_front() {
        if !visited.insert(current) {
            continue;
        }
        let Some(node) = find_node(nodes, current) else {
            continue;
        };

        if node.kind() == NodeKind::Source {
            // `path` runs from the queried node up to this source; scan it
            // from the source end.
            let selector = path.iter().rev().find_map(|id| {
                find_node(nodes, id).filter(|n| n.kind() == NodeKind::SheetSelector)
            });
            return selector.map(|selector| LineagePath {
                source_id: node.id.clone(),
                selector_id: selector.id.clone(),
            });
        }

        for &pred in reverse.predecessors(current) {
            if !visited.contains(pred) {
                let mut next_path = path.clone();
                next_path.push(pred);
                queue.push_back((pred, next_path));
            }
        }
    }
    None
}

/// Resolves the spreadsheet location feeding `node_id`.
///
/// Returns `None` when lineage cannot be established: no reachable source, no
/// selector on the path, a selector without a target file, a manual selector
/// without a sheet name, or a file id missing from `files`.
pub fn trace_node_data_source<F>(
    node_id: &str,
    nodes: &[Node],
    edges: &[Edge],
    files: &F,
) -> Option<LineageResult>
where
    F: FileMetaProvider + ?Sized,
{
    let Some(path) = find_lineage_path(node_id, nodes, edges) else {
        tracing::debug!(node_id, "lineage unresolved: no source/selector pair upstream");
        return None;
    };
    let selector = find_node(nodes, &path.selector_id)?.config().as_sheet_selector()?;
    let file_id = selector.target_file_id.as_deref()?;
    let Some(file) = files.file_meta(file_id) else {
        tracing::debug!(node_id, file_id, "lineage unresolved: file not registered");
        return None;
    };

    let (sheet_name, header_row, resolution) = match selector.mode {
        SheetMode::Manual => {
            let sheet_name = selector.manual_sheet_name.as_deref().filter(|s| !s.is_empty())?;
            let header_row = file.sheet(sheet_name).map_or(0, |s| s.header_row);
            (sheet_name.to_string(), header_row, SheetResolution::Exact)
        }
        SheetMode::AutoByIndex => {
            let first = file.first_sheet();
            (
                first.map(|s| s.sheet_name.clone()).unwrap_or_default(),
                first.map_or(0, |s| s.header_row),
                SheetResolution::Representative,
            )
        }
    };

    tracing::trace!(node_id, file_id, sheet = %sheet_name, header_row, "lineage resolved");
    Some(LineageResult {
        file_id: file_id.to_string(),
        file_path: file.path.clone(),
        sheet_name,
        header_row,
        resolution,
        path,
    })
}
