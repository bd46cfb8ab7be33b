//! Directed cycle detection.
//!
//! Three-color depth-first search with an explicit frame stack:
//! - White: unvisited
//! - Gray: on the current DFS stack
//! - Black: finished, every descendant visited
//!
//! Reaching a Gray node closes a cycle. Every node is used as a root, so
//! cycles in components unreachable from the others are still found.

use super::{Adjacency, Edge, Node, edge_pairs};
use ahash::AHashMap;
use std::iter;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// True iff some non-empty sequence of `edges` forms a closed walk.
pub fn has_cycle(nodes: &[Node], edges: &[Edge]) -> bool {
    find_cycle(nodes, edges).is_some()
}

/// Returns the node ids of the first cycle found, with the closing node
/// repeated at the end (`a → b → a` is `["a", "b", "a"]`).
pub fn find_cycle(nodes: &[Node], edges: &[Edge]) -> Option<Vec<String>> {
    let roots = nodes.iter().map(|n| n.id.as_str());
    find_cycle_in(roots, edge_pairs(edges)).map(|path| path.into_iter().map(String::from).collect())
}

/// Evaluates [`has_cycle`] on `edges ∪ {candidate}`.
pub fn would_create_cycle(candidate: &Edge, nodes: &[Node], edges: &[Edge]) -> bool {
    let candidate_pair = (candidate.source.as_str(), candidate.target.as_str());
    let pairs = edge_pairs(edges).chain(iter::once(candidate_pair));
    let roots = nodes.iter().map(|n| n.id.as_str());
    find_cycle_in(roots, pairs).is_some()
}

/// Core search over raw `(source, target)` pairs.
///
/// `roots` fixes the visiting order; edge endpoints missing from `roots` are
/// visited afterwards so dangling edges still take part in the search.
pub(crate) fn find_cycle_in<'a, R, P>(roots: R, pairs: P) -> Option<Vec<&'a str>>
where
    R: IntoIterator<Item = &'a str>,
    P: IntoIterator<Item = (&'a str, &'a str)> + Clone,
{
    let adjacency = Adjacency::from_pairs(pairs.clone());
    let mut colors: AHashMap<&'a str, Color> = AHashMap::new();
    let mut stack: Vec<&'a str> = Vec::new();

    let order = roots
        .into_iter()
        .chain(pairs.into_iter().map(|(source, _)| source));

    for root in order {
        if colors.get(root).copied().unwrap_or(Color::White) == Color::White {
            if let Some(cycle) = visit(root, &adjacency, &mut colors, &mut stack) {
                tracing::trace!(cycle = ?cycle, "cycle found");
                return Some(cycle);
            }
        }
    }
    None
}

fn visit<'a>(
    root: &'a str,
    adjacency: &Adjacency<'a>,
    colors: &mut AHashMap<&'a str, Color>,
    stack: &mut Vec<&'a str>,
) -> Option<Vec<&'a str>> {
    // Each frame is a node plus the index of its next successor to try.
    let mut frames: Vec<(&'a str, usize)> = vec![(root, 0)];
    colors.insert(root, Color::Gray);
    stack.push(root);

    while let Some(frame) = frames.last_mut() {
        let (node, cursor) = *frame;
        let Some(&next) = adjacency.successors(node).get(cursor) else {
            frames.pop();
            stack.pop();
            colors.insert(node, Color::Black);
            continue;
        };
        frame.1 += 1;

        match colors.get(next).copied().unwrap_or(Color::White) {
            Color::Gray => {
                // Gray means `next` is on the stack.
                let start = stack.iter().position(|id| *id == next).unwrap_or(0);
                let mut cycle = stack[start..].to_vec();
                cycle.push(next);
                return Some(cycle);
            }
            Color::White => {
                colors.insert(next, Color::Gray);
                stack.push(next);
                frames.push((next, 0));
            }
            Color::Black => {}
        }
    }
    None
}
