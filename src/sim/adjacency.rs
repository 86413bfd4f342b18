use super::{Edge, EdgeId, NodeId};

/// Node-to-incident-edge index, built once per simulation.
#[derive(Clone, Debug, Default)]
pub struct Adjacency {
    incident: Vec<Vec<EdgeId>>,
}

impl Adjacency {
    pub fn build(node_count: usize, edges: &[Edge]) -> Self {
        let mut incident = vec![Vec::new(); node_count];
        for (index, edge) in edges.iter().enumerate() {
            let id = EdgeId(index);
            incident[edge.source.0].push(id);
            if edge.target != edge.source {
                incident[edge.target.0].push(id);
            }
        }
        Self { incident }
    }

    pub fn incident(&self, node: NodeId) -> &[EdgeId] {
        self.incident
            .get(node.0)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.incident(node).len()
    }

    pub fn degrees(&self) -> Vec<usize> {
        self.incident.iter().map(Vec::len).collect()
    }

    /// Nodes one edge away from `node`, in edge order, possibly repeated
    /// when parallel edges exist.
    pub fn neighbors<'a>(
        &'a self,
        node: NodeId,
        edges: &'a [Edge],
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.incident(node)
            .iter()
            .filter_map(move |edge| edges.get(edge.0))
            .map(move |edge| edge.other(node))
    }
}
