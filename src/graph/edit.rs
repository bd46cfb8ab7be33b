use super::{Edge, Graph, Node, Position};
use crate::error::EditError;
use crate::schema::NodeKind;
use crate::validation::validate_connection;

/// Horizontal offset of a successor created from an existing node.
const SUCCESSOR_OFFSET_X: f64 = 300.0;

// Edits return a new snapshot and leave `self` untouched.
impl Graph {
    pub fn with_node(&self, node: Node) -> Result<Graph, EditError> {
        if self.contains(&node.id) {
            return Err(EditError::DuplicateNode(node.id));
        }
        let mut next = self.clone();
        next.nodes.push(node);
        Ok(next)
    }

    /// Removes a node together with every edge touching it.
    pub fn without_node(&self, node_id: &str) -> Result<Graph, EditError> {
        if !self.contains(node_id) {
            return Err(EditError::UnknownNode(node_id.to_string()));
        }
        Ok(Graph {
            nodes: self.nodes.iter().filter(|n| n.id != node_id).cloned().collect(),
            edges: self.edges.iter().filter(|e| !e.touches(node_id)).cloned().collect(),
        })
    }

    /// Adds `edge` only if the connection validator accepts it.
    pub fn with_edge(&self, edge: Edge) -> Result<Graph, EditError> {
        if let Err(reason) = validate_connection(&edge, &self.nodes, &self.edges) {
            tracing::debug!(source = %edge.source, target = %edge.target, %reason, "edge rejected");
            return Err(EditError::Rejected(reason));
        }
        let mut next = self.clone();
        next.edges.push(edge);
        Ok(next)
    }

    /// Removes every edge from `source` to `target`. Missing edges are not an error.
    pub fn without_edge(&self, source: &str, target: &str) -> Graph {
        Graph {
            nodes: self.nodes.clone(),
            edges: self
                .edges
                .iter()
                .filter(|e| !e.connects(source, target))
                .cloned()
                .collect(),
        }
    }

    /// Creates a node of `kind` to the right of `source_id` and connects it.
    pub fn with_successor(
        &self,
        source_id: &str,
        kind: NodeKind,
        new_id: impl Into<String>,
    ) -> Result<Graph, EditError> {
        let source = self
            .node(source_id)
            .ok_or_else(|| EditError::UnknownNode(source_id.to_string()))?;
        let position = Position::new(source.position.x + SUCCESSOR_OFFSET_X, source.position.y);
        let node = Node::new(new_id, kind, position);
        let edge = Edge::between(source_id, node.id.clone());
        self.with_node(node)?.with_edge(edge)
    }

    /// Moves nodes by id. Unknown ids are ignored.
    pub fn with_positions<'p, I>(&self, positions: I) -> Graph
    where
        I: IntoIterator<Item = (&'p str, Position)>,
    {
        let mut next = self.clone();
        for (id, position) in positions {
            if let Some(node) = next.nodes.iter_mut().find(|n| n.id == id) {
                node.position = position;
            }
        }
        next
    }
}
