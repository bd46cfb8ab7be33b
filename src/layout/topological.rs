use super::{Direction, LayoutConfig, LayoutEngine};
use crate::error::LayoutError;
use crate::graph::{Edge, Node, Position};
use ahash::AHashMap;

/// Grid placement by topological depth (Kahn's algorithm).
///
/// Nodes with in-degree 0 form layer 0; removing a layer's outgoing edges
/// yields the next one. Nodes that never reach in-degree 0 (cycle members)
/// share one trailing layer in input order.
pub struct TopologicalLayout;

impl TopologicalLayout {
    pub fn layers(nodes: &[Node], edges: &[Edge]) -> Vec<Vec<usize>> {
        let index: AHashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();

        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        let mut in_degree = vec![0usize; nodes.len()];
        for edge in edges {
            if let (Some(&s), Some(&t)) = (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
                successors[s].push(t);
                in_degree[t] += 1;
            }
        }

        let mut layers: Vec<Vec<usize>> = Vec::new();
        let mut placed = vec![false; nodes.len()];
        let mut current: Vec<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();

        while !current.is_empty() {
            let mut next = Vec::new();
            for &i in &current {
                placed[i] = true;
                for &t in &successors[i] {
                    in_degree[t] -= 1;
                    if in_degree[t] == 0 {
                        next.push(t);
                    }
                }
            }
            layers.push(current);
            current = next;
        }

        let leftover: Vec<usize> = (0..nodes.len()).filter(|&i| !placed[i]).collect();
        if !leftover.is_empty() {
            layers.push(leftover);
        }
        layers
    }

    /// Infallible placement: `x = indexInLayer * (width + gutter)`,
    /// `y = layer * (height + gutter)` for top-to-bottom flow, axes swapped for
    /// left-to-right.
    pub fn positions(
        &self,
        nodes: &[Node],
        edges: &[Edge],
        direction: Direction,
        config: &LayoutConfig,
    ) -> Vec<Position> {
        let mut positions = vec![Position::default(); nodes.len()];
        let step_x = config.node_width + config.fallback_gutter_x;
        let step_y = config.node_height + config.fallback_gutter_y;

        for (layer, members) in Self::layers(nodes, edges).iter().enumerate() {
            for (slot, &i) in members.iter().enumerate() {
                positions[i] = match direction {
                    Direction::TopBottom => Position::new(slot as f64 * step_x, layer as f64 * step_y),
                    Direction::LeftRight => Position::new(layer as f64 * step_x, slot as f64 * step_y),
                };
            }
        }
        positions
    }
}

impl LayoutEngine for TopologicalLayout {
    fn name(&self) -> &'static str {
        "topological"
    }

    fn arrange(
        &self,
        nodes: &[Node],
        edges: &[Edge],
        direction: Direction,
        config: &LayoutConfig,
    ) -> Result<Vec<Position>, LayoutError> {
        Ok(self.positions(nodes, edges, direction, config))
    }
}
