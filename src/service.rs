//! Contracts of the external collaborators this crate prepares requests for
//! and interprets responses from.
//!
//! The implementations (spreadsheet reader, pipeline executor) live outside the
//! crate; tests use in-memory fakes.

use crate::error::ServiceError;
use crate::graph::Graph;
use crate::lineage::trace_node_data_source;
use crate::preview::{BranchRecord, NormalizedResult, ResultNormalizer};
use crate::workspace::FileMetaProvider;

/// Reads the header row of one sheet.
pub trait HeaderRowReader {
    fn read_header_row(
        &self,
        file_path: &str,
        sheet_name: &str,
        header_row: usize,
    ) -> Result<Vec<String>, ServiceError>;
}

/// Runs the pipeline up to a node and returns one record per branch.
pub trait PipelineService {
    /// Partial evaluation for a preview panel, at most `max_rows` rows per branch.
    fn preview_node(
        &self,
        node_id: &str,
        max_rows: usize,
        graph: &Graph,
    ) -> Result<Vec<BranchRecord>, ServiceError>;

    fn execute_node(&self, node_id: &str, graph: &Graph) -> Result<Vec<BranchRecord>, ServiceError>;
}

/// Column names available at `node_id`.
///
/// Empty when lineage cannot be resolved or the file has no sheet metadata;
/// reader failures are propagated.
pub fn resolve_columns<F, R>(
    node_id: &str,
    graph: &Graph,
    files: &F,
    reader: &R,
) -> Result<Vec<String>, ServiceError>
where
    F: FileMetaProvider + ?Sized,
    R: HeaderRowReader + ?Sized,
{
    let Some(lineage) = trace_node_data_source(node_id, &graph.nodes, &graph.edges, files) else {
        return Ok(Vec::new());
    };
    if !lineage.is_usable() {
        tracing::debug!(node_id, file_id = %lineage.file_id, "file has no sheet metadata");
        return Ok(Vec::new());
    }
    let request = lineage.header_request();
    reader.read_header_row(request.file_path, request.sheet_name, request.header_row)
}

/// Previews `node_id` and normalizes the response. A service failure becomes
/// the error of the returned result.
pub fn preview_node<S>(
    service: &S,
    normalizer: &ResultNormalizer,
    node_id: &str,
    max_rows: usize,
    graph: &Graph,
) -> Result<NormalizedResult, ServiceError>
where
    S: PipelineService + ?Sized,
{
    run_node(normalizer, node_id, graph, || service.preview_node(node_id, max_rows, graph))
}

/// Executes `node_id` and normalizes the response.
pub fn execute_node<S>(
    service: &S,
    normalizer: &ResultNormalizer,
    node_id: &str,
    graph: &Graph,
) -> Result<NormalizedResult, ServiceError>
where
    S: PipelineService + ?Sized,
{
    run_node(normalizer, node_id, graph, || service.execute_node(node_id, graph))
}

fn run_node(
    normalizer: &ResultNormalizer,
    node_id: &str,
    graph: &Graph,
    call: impl FnOnce() -> Result<Vec<BranchRecord>, ServiceError>,
) -> Result<NormalizedResult, ServiceError> {
    let kind = graph
        .node(node_id)
        .map(|n| n.kind())
        .ok_or_else(|| ServiceError::UnknownNode(node_id.to_string()))?;

    match call() {
        Ok(records) => Ok(normalizer.normalize(node_id, kind, &records)),
        Err(e) => {
            tracing::warn!(node_id, error = %e, "pipeline service failed");
            Ok(NormalizedResult::failed(node_id, kind, e.to_string()))
        }
    }
}
