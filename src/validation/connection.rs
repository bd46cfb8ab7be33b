use crate::error::ConnectionError;
use crate::graph::cycle::find_cycle_in;
use crate::graph::{Edge, Node, find_node};
use crate::schema::NodeKind;
use std::iter;

/// Accepts or rejects `candidate` against the current graph.
///
/// Checks run in order and stop at the first failure:
/// 1. both endpoints exist
/// 2. the target kind is an allowed successor of the source kind
/// 3. no edge with the same (source, target) exists
/// 4. a single-input target has no inbound edge yet
/// 5. the edge does not close a cycle
///
/// Pure predicate; `edges` must not already contain `candidate` (whole-graph
/// validation passes the edge set with the checked edge removed).
pub fn validate_connection(
    candidate: &Edge,
    nodes: &[Node],
    edges: &[Edge],
) -> Result<(), ConnectionError> {
    check_connection(candidate, nodes, edges.iter())
}

pub fn is_valid_connection(candidate: &Edge, nodes: &[Node], edges: &[Edge]) -> bool {
    validate_connection(candidate, nodes, edges).is_ok()
}

pub(crate) fn check_connection<'a, I>(
    candidate: &'a Edge,
    nodes: &'a [Node],
    edges: I,
) -> Result<(), ConnectionError>
where
    I: Iterator<Item = &'a Edge> + Clone,
{
    let source = find_node(nodes, &candidate.source)
        .ok_or_else(|| ConnectionError::NodeNotFound(candidate.source.clone()))?;
    let target = find_node(nodes, &candidate.target)
        .ok_or_else(|| ConnectionError::NodeNotFound(candidate.target.clone()))?;

    let (source_kind, target_kind) = (source.kind(), target.kind());
    if !source_kind.can_connect_to(target_kind) {
        return Err(ConnectionError::IncompatibleKinds {
            source_kind,
            target_kind,
        });
    }

    if edges
        .clone()
        .any(|e| e.connects(&candidate.source, &candidate.target))
    {
        return Err(ConnectionError::ConnectionExists {
            source_id: candidate.source.clone(),
            target_id: candidate.target.clone(),
        });
    }

    if target_kind.io_limits().is_single_input()
        && edges.clone().any(|e| e.target == candidate.target)
    {
        return Err(ConnectionError::SingleInputOnly(target_kind));
    }

    let pairs = edges
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .chain(iter::once((candidate.source.as_str(), candidate.target.as_str())));
    let roots = nodes.iter().map(|n| n.id.as_str());
    if find_cycle_in(roots, pairs).is_some() {
        return Err(ConnectionError::CycleDetected {
            source_id: candidate.source.clone(),
            target_id: candidate.target.clone(),
        });
    }

    Ok(())
}

/// Kinds the editor may offer when creating a connected successor of `node_id`.
///
/// Empty for unknown nodes and for kinds whose output limit is already used up.
pub fn available_successor_kinds(node_id: &str, nodes: &[Node], edges: &[Edge]) -> Vec<NodeKind> {
    let Some(node) = find_node(nodes, node_id) else {
        return Vec::new();
    };
    let kind = node.kind();
    let outputs = edges.iter().filter(|e| e.source == node_id).count();
    match kind.io_limits().max_outputs {
        Some(max) if outputs >= max => Vec::new(),
        _ => kind.allowed_successors().to_vec(),
    }
}
