//! Automatic node placement for the editor canvas.
//!
//! Two strategies share one contract: given nodes and edges, return one
//! top-left position per node, in node order. [`AutoLayout`] runs the primary
//! strategy and falls back to the topological one when the primary cannot run.
//! Both are deterministic for unchanged input.

use crate::error::LayoutError;
use crate::graph::{Edge, HandleSide, Node, Position};
use serde::{Deserialize, Serialize};

mod layered;
mod topological;

pub use layered::LayeredLayout;
pub use topological::TopologicalLayout;

/// Flow direction of the drawn graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Top to bottom.
    #[default]
    #[serde(rename = "TB")]
    TopBottom,
    /// Left to right.
    #[serde(rename = "LR")]
    LeftRight,
}

impl Direction {
    /// Handle sides implied by the direction: `(target/input side, source/output side)`.
    pub fn handle_sides(self) -> (HandleSide, HandleSide) {
        match self {
            Direction::TopBottom => (HandleSide::Top, HandleSide::Bottom),
            Direction::LeftRight => (HandleSide::Left, HandleSide::Right),
        }
    }
}

/// Box size and spacing constants shared by both strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between neighbours in the same rank (primary strategy).
    pub node_gap: f64,
    /// Gap between consecutive ranks (primary strategy).
    pub rank_gap: f64,
    /// Canvas margin around the drawing (primary strategy).
    pub margin: f64,
    /// Horizontal gutter of the fallback grid.
    pub fallback_gutter_x: f64,
    /// Vertical gutter of the fallback grid.
    pub fallback_gutter_y: f64,
    /// Barycenter sweeps used to reduce edge crossings.
    pub ordering_passes: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 250.0,
            node_height: 100.0,
            node_gap: 100.0,
            rank_gap: 100.0,
            margin: 50.0,
            fallback_gutter_x: 50.0,
            fallback_gutter_y: 80.0,
            ordering_passes: 4,
        }
    }
}

impl LayoutConfig {
    pub fn with_node_size(mut self, width: f64, height: f64) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    pub fn with_spacing(mut self, node_gap: f64, rank_gap: f64) -> Self {
        self.node_gap = node_gap;
        self.rank_gap = rank_gap;
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_fallback_gutters(mut self, x: f64, y: f64) -> Self {
        self.fallback_gutter_x = x;
        self.fallback_gutter_y = y;
        self
    }
}

/// A placement strategy.
pub trait LayoutEngine {
    fn name(&self) -> &'static str;

    /// One position per entry of `nodes`, in the same order.
    fn arrange(
        &self,
        nodes: &[Node],
        edges: &[Edge],
        direction: Direction,
        config: &LayoutConfig,
    ) -> Result<Vec<Position>, LayoutError>;
}

/// Primary strategy with a topological fallback.
pub struct AutoLayout {
    config: LayoutConfig,
    primary: Option<Box<dyn LayoutEngine>>,
}

impl Default for AutoLayout {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl AutoLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            primary: Some(Box::new(LayeredLayout)),
        }
    }

    pub fn with_primary(mut self, engine: Box<dyn LayoutEngine>) -> Self {
        self.primary = Some(engine);
        self
    }

    /// Always use the topological fallback.
    pub fn without_primary(mut self) -> Self {
        self.primary = None;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Returns copies of `nodes` with positions and handle sides assigned.
    pub fn apply(&self, nodes: &[Node], edges: &[Edge], direction: Direction) -> Vec<Node> {
        let positions = self.positions(nodes, edges, direction);
        let (target_side, source_side) = direction.handle_sides();
        nodes
            .iter()
            .zip(positions)
            .map(|(node, position)| Node {
                position,
                target_side: Some(target_side),
                source_side: Some(source_side),
                ..node.clone()
            })
            .collect()
    }

    fn positions(&self, nodes: &[Node], edges: &[Edge], direction: Direction) -> Vec<Position> {
        if let Some(primary) = &self.primary {
            match primary.arrange(nodes, edges, direction, &self.config) {
                Ok(positions) if positions.len() == nodes.len() => return positions,
                Ok(positions) => tracing::warn!(
                    engine = primary.name(),
                    expected = nodes.len(),
                    returned = positions.len(),
                    "layout engine returned a partial placement, using fallback"
                ),
                Err(e) => tracing::warn!(engine = primary.name(), error = %e, "layout engine failed, using fallback"),
            }
        }
        TopologicalLayout.positions(nodes, edges, direction, &self.config)
    }
}

/// Lays out with the default configuration and strategies.
pub fn layout(nodes: &[Node], edges: &[Edge], direction: Direction) -> Vec<Node> {
    AutoLayout::default().apply(nodes, edges, direction)
}
