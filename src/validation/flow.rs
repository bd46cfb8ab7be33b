use super::connection::check_connection;
use super::{FlowError, FlowWarning, ValidationResult};
use crate::graph::cycle::find_cycle;
use crate::graph::{Adjacency, Edge, Node};
use crate::schema::NodeKind;

/// Whole-graph health check.
///
/// Every rule runs independently and all findings are collected, since the
/// result feeds a panel listing everything that is wrong:
/// - no Source node, no Output node, more than one Output node: errors
/// - a non-Source node without inbound edges: warning
/// - a non-Output node without outbound edges: warning
/// - a directed cycle: error
/// - every committed edge re-checked by the connection validator (with itself
///   removed from the edge set): each failure is an error
pub fn validate_flow(nodes: &[Node], edges: &[Edge]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let sources = nodes.iter().filter(|n| n.kind() == NodeKind::Source).count();
    if sources == 0 {
        errors.push(FlowError::MissingSource);
    }

    match nodes.iter().filter(|n| n.kind() == NodeKind::Output).count() {
        0 => errors.push(FlowError::MissingOutput),
        1 => {}
        count => errors.push(FlowError::MultipleOutputs(count)),
    }

    let adjacency = Adjacency::from_edges(edges);
    for node in nodes {
        let kind = node.kind();
        if kind.io_limits().requires_input && adjacency.predecessors(&node.id).is_empty() {
            warnings.push(FlowWarning::NoInput {
                node_id: node.id.clone(),
                label: node.label().to_string(),
            });
        }
        if kind != NodeKind::Output && adjacency.successors(&node.id).is_empty() {
            warnings.push(FlowWarning::NoOutput {
                node_id: node.id.clone(),
                label: node.label().to_string(),
            });
        }
    }

    if let Some(path) = find_cycle(nodes, edges) {
        errors.push(FlowError::Cycle(path));
    }

    for (index, edge) in edges.iter().enumerate() {
        let others = edges
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != index)
            .map(|(_, e)| e);
        if let Err(reason) = check_connection(edge, nodes, others) {
            errors.push(FlowError::InvalidConnection {
                source_id: edge.source.clone(),
                target_id: edge.target.clone(),
                reason,
            });
        }
    }

    let result = ValidationResult::from_findings(errors, warnings);
    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "flow validated"
    );
    result
}
