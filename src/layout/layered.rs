use super::{Direction, LayoutConfig, LayoutEngine};
use crate::error::LayoutError;
use crate::graph::cycle::find_cycle_in;
use crate::graph::{Edge, Node, Position};
use ahash::AHashMap;
use std::collections::VecDeque;

/// Layered drawing in three phases:
/// 1. rank assignment by longest path from the roots
/// 2. in-rank ordering by alternating barycenter sweeps
/// 3. coordinate assignment, each rank centred on the widest one
///
/// Requires an acyclic graph.
pub struct LayeredLayout;

struct RankedGraph {
    /// Rank of each node, indexed like the input nodes.
    ranks: Vec<usize>,
    predecessors: Vec<Vec<usize>>,
    successors: Vec<Vec<usize>>,
    /// Node indices in topological order.
    topo_order: Vec<usize>,
}

impl LayeredLayout {
    fn rank(nodes: &[Node], edges: &[Edge]) -> Result<RankedGraph, LayoutError> {
        let index: AHashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();
        let pairs: Vec<(usize, usize)> = edges
            .iter()
            .filter_map(|e| Some((*index.get(e.source.as_str())?, *index.get(e.target.as_str())?)))
            .collect();

        let id_pairs = pairs.iter().map(|&(s, t)| (nodes[s].id.as_str(), nodes[t].id.as_str()));
        if let Some(cycle) = find_cycle_in(nodes.iter().map(|n| n.id.as_str()), id_pairs) {
            return Err(LayoutError::Cyclic(cycle.into_iter().map(String::from).collect()));
        }

        let mut predecessors = vec![Vec::new(); nodes.len()];
        let mut successors = vec![Vec::new(); nodes.len()];
        let mut in_degree = vec![0usize; nodes.len()];
        for &(s, t) in &pairs {
            successors[s].push(t);
            predecessors[t].push(s);
            in_degree[t] += 1;
        }

        let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
        let mut topo_order = Vec::with_capacity(nodes.len());
        let mut ranks = vec![0usize; nodes.len()];
        while let Some(i) = queue.pop_front() {
            topo_order.push(i);
            for &t in &successors[i] {
                ranks[t] = ranks[t].max(ranks[i] + 1);
                in_degree[t] -= 1;
                if in_degree[t] == 0 {
                    queue.push_back(t);
                }
            }
        }

        Ok(RankedGraph {
            ranks,
            predecessors,
            successors,
            topo_order,
        })
    }

    /// Groups nodes by rank and reduces crossings with barycenter sweeps.
    fn order(graph: &RankedGraph, passes: usize) -> Vec<Vec<usize>> {
        let rank_count = graph.ranks.iter().max().map_or(0, |r| r + 1);
        let mut layers: Vec<Vec<usize>> = vec![Vec::new(); rank_count];
        for &i in &graph.topo_order {
            layers[graph.ranks[i]].push(i);
        }

        let mut slot = vec![0usize; graph.ranks.len()];
        let reindex = |layer: &[usize], slot: &mut [usize]| {
            for (s, &i) in layer.iter().enumerate() {
                slot[i] = s;
            }
        };
        for layer in &layers {
            reindex(layer, &mut slot);
        }

        for pass in 0..passes {
            let downward = pass % 2 == 0;
            let sweep: Vec<usize> = if downward {
                (1..rank_count).collect()
            } else {
                (0..rank_count.saturating_sub(1)).rev().collect()
            };
            for r in sweep {
                let neighbours = if downward {
                    &graph.predecessors
                } else {
                    &graph.successors
                };
                let mut keyed: Vec<(f64, usize)> = layers[r]
                    .iter()
                    .map(|&i| {
                        let adjacent = &neighbours[i];
                        let key = if adjacent.is_empty() {
                            slot[i] as f64
                        } else {
                            adjacent.iter().map(|&n| slot[n] as f64).sum::<f64>() / adjacent.len() as f64
                        };
                        (key, i)
                    })
                    .collect();
                // Stable: ties keep their current relative order.
                keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
                layers[r] = keyed.into_iter().map(|(_, i)| i).collect();
                reindex(&layers[r], &mut slot);
            }
        }
        layers
    }
}

impl LayoutEngine for LayeredLayout {
    fn name(&self) -> &'static str {
        "layered"
    }

    fn arrange(
        &self,
        nodes: &[Node],
        edges: &[Edge],
        direction: Direction,
        config: &LayoutConfig,
    ) -> Result<Vec<Position>, LayoutError> {
        let graph = Self::rank(nodes, edges)?;
        let layers = Self::order(&graph, config.ordering_passes);
        let widest = layers.iter().map(Vec::len).max().unwrap_or(0);

        let (main_size, cross_size) = match direction {
            Direction::TopBottom => (config.node_height, config.node_width),
            Direction::LeftRight => (config.node_width, config.node_height),
        };
        let rank_step = main_size + config.rank_gap;
        let cross_step = cross_size + config.node_gap;

        let mut positions = vec![Position::default(); nodes.len()];
        for (rank, layer) in layers.iter().enumerate() {
            let offset = (widest - layer.len()) as f64 * cross_step / 2.0;
            for (slot, &i) in layer.iter().enumerate() {
                let along = config.margin + rank as f64 * rank_step;
                let across = config.margin + offset + slot as f64 * cross_step;
                positions[i] = match direction {
                    Direction::TopBottom => Position::new(across, along),
                    Direction::LeftRight => Position::new(along, across),
                };
            }
        }
        Ok(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::NodeKind;

    fn node(id: &str) -> Node {
        Node::new(id, NodeKind::RowFilter, Position::default())
    }

    #[test]
    fn ranks_follow_longest_path() {
        let nodes = vec![node("a"), node("b"), node("c")];
        let edges = vec![Edge::between("a", "b"), Edge::between("b", "c"), Edge::between("a", "c")];
        let graph = LayeredLayout::rank(&nodes, &edges).expect("acyclic");
        assert_eq!(graph.ranks, vec![0, 1, 2]);
    }

    #[test]
    fn barycenter_untangles_crossed_pairs() {
        // a→d and b→c: initial order [c, d] crosses, sweeping yields [d, c].
        let nodes = vec![node("a"), node("b"), node("d"), node("c")];
        let edges = vec![Edge::between("b", "c"), Edge::between("a", "d")];
        let graph = LayeredLayout::rank(&nodes, &edges).expect("acyclic");
        let layers = LayeredLayout::order(&graph, 2);
        let second: Vec<&str> = layers[1].iter().map(|&i| nodes[i].id.as_str()).collect();
        assert_eq!(second, vec!["d", "c"]);
    }

    #[test]
    fn cyclic_graph_is_rejected() {
        let nodes = vec![node("a"), node("b")];
        let edges = vec![Edge::between("a", "b"), Edge::between("b", "a")];
        assert!(matches!(LayeredLayout::rank(&nodes, &edges), Err(LayoutError::Cyclic(_))));
    }
}
