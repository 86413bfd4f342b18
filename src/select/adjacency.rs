use std::collections::HashSet;

use crate::sim::{EdgeId, NodeId, Simulation};

/// Stroke multiplier applied to highlighted edges.
pub const EMPHASIS_SCALE: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HoverTarget {
    Node(NodeId),
    Edge(EdgeId),
}

/// Transient emphasis around whatever the pointer is over.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdjacencyHighlight {
    pub related_nodes: HashSet<NodeId>,
    pub related_edges: HashSet<EdgeId>,
}

impl AdjacencyHighlight {
    /// The hovered node, every incident edge and, with `include_neighbors`,
    /// the node at the other end of each of those edges.
    pub fn for_node(simulation: &Simulation, node: NodeId, include_neighbors: bool) -> Option<Self> {
        simulation.node(node)?;

        let mut related_nodes = HashSet::from([node]);
        let related_edges = simulation
            .adjacency()
            .incident(node)
            .iter()
            .copied()
            .collect::<HashSet<_>>();

        if include_neighbors {
            related_nodes.extend(simulation.adjacency().neighbors(node, simulation.edges()));
        }

        Some(Self {
            related_nodes,
            related_edges,
        })
    }

    pub fn for_edge(simulation: &Simulation, edge: EdgeId) -> Option<Self> {
        let link = simulation.edge(edge)?;
        Some(Self {
            related_nodes: HashSet::from([link.source, link.target]),
            related_edges: HashSet::from([edge]),
        })
    }

    pub fn for_target(
        simulation: &Simulation,
        target: HoverTarget,
        include_neighbors: bool,
    ) -> Option<Self> {
        match target {
            HoverTarget::Node(node) => Self::for_node(simulation, node, include_neighbors),
            HoverTarget::Edge(edge) => Self::for_edge(simulation, edge),
        }
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.related_nodes.contains(&node)
    }

    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.related_edges.contains(&edge)
    }

    /// Stroke width for an edge whose unhighlighted width is `base_width`.
    pub fn edge_width(&self, edge: EdgeId, base_width: f32) -> f32 {
        if self.contains_edge(edge) {
            base_width * EMPHASIS_SCALE
        } else {
            base_width
        }
    }
}
