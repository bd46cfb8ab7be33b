//! Randomized checks of graph-level guarantees over seeded graphs.
mod common;
use common::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sheetflow::prelude::*;

const SEEDS: u64 = 64;

fn random_graph(rng: &mut StdRng) -> Graph {
    let count: usize = rng.random_range(1..10);
    let nodes: Vec<Node> = (0..count)
        .map(|i| {
            let kind = NodeKind::ALL[rng.random_range(0..NodeKind::ALL.len())];
            node(&format!("n{}", i), kind)
        })
        .collect();
    let edge_count = rng.random_range(0..count * 2);
    let edges = (0..edge_count)
        .map(|_| {
            let s = rng.random_range(0..count);
            let t = rng.random_range(0..count);
            edge(&format!("n{}", s), &format!("n{}", t))
        })
        .collect();
    Graph::new(nodes, edges)
}

/// Reference check: a cycle exists iff repeatedly removing nodes without
/// inbound edges leaves something behind.
fn has_cycle_by_peeling(graph: &Graph) -> bool {
    let mut remaining: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    loop {
        let before = remaining.len();
        let kept: Vec<&str> = remaining
            .iter()
            .copied()
            .filter(|id| {
                graph
                    .edges
                    .iter()
                    .any(|e| e.target == *id && remaining.contains(&e.source.as_str()))
            })
            .collect();
        remaining = kept;
        if remaining.is_empty() {
            return false;
        }
        if remaining.len() == before {
            return true;
        }
    }
}

#[test]
fn test_has_cycle_matches_reference() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = random_graph(&mut rng);
        assert_eq!(
            has_cycle(&graph.nodes, &graph.edges),
            has_cycle_by_peeling(&graph),
            "seed {}",
            seed
        );
    }
}

#[test]
fn test_would_create_cycle_is_monotonic() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = random_graph(&mut rng);
        let count = graph.nodes.len();
        let candidate = edge(
            &format!("n{}", rng.random_range(0..count)),
            &format!("n{}", rng.random_range(0..count)),
        );
        if !would_create_cycle(&candidate, &graph.nodes, &graph.edges) {
            continue;
        }
        let mut grown = graph.clone();
        grown.edges.push(edge(
            &format!("n{}", rng.random_range(0..count)),
            &format!("n{}", rng.random_range(0..count)),
        ));
        assert!(
            would_create_cycle(&candidate, &grown.nodes, &grown.edges),
            "seed {}",
            seed
        );
    }
}

#[test]
fn test_validation_is_deterministic() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = random_graph(&mut rng);
        assert_eq!(graph.validate(), graph.validate(), "seed {}", seed);
    }
}

#[test]
fn test_rejections_are_reported_by_flow_validation() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = random_graph(&mut rng);
        let count = graph.nodes.len();
        let candidate = edge(
            &format!("n{}", rng.random_range(0..count)),
            &format!("n{}", rng.random_range(0..count)),
        );
        if validate_connection(&candidate, &graph.nodes, &graph.edges).is_ok() {
            continue;
        }
        let mut forced = graph.clone();
        forced.edges.push(candidate);
        assert!(!forced.validate().is_valid, "seed {}", seed);
    }
}

#[test]
fn test_layout_is_deterministic_and_complete() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = random_graph(&mut rng);
        for direction in [Direction::TopBottom, Direction::LeftRight] {
            let first = layout(&graph.nodes, &graph.edges, direction);
            let second = layout(&graph.nodes, &graph.edges, direction);
            assert_eq!(first, second, "seed {}", seed);
            assert_eq!(first.len(), graph.nodes.len());
        }
    }
}

#[test]
fn test_acyclic_layout_has_no_overlaps() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = random_graph(&mut rng);
        if graph.has_cycle() {
            continue;
        }
        let placed = layout(&graph.nodes, &graph.edges, Direction::TopBottom);
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                assert_ne!(a.position, b.position, "seed {}: {} and {}", seed, a.id, b.id);
            }
        }
    }
}
