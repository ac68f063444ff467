use petgraph::graphmap::UnGraphMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sequential node identifier. Node 0 is always the seed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const SEED: NodeId = NodeId(0);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Seed,
    Internal,
    External,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Seed => "seed",
            NodeKind::Internal => "internal",
            NodeKind::External => "external",
        }
    }

    /// Fill colour used by the renderers.
    pub fn color(&self) -> &'static str {
        match self {
            NodeKind::Seed => "green",
            NodeKind::External => "yellow",
            NodeKind::Internal => "blue",
        }
    }

    pub fn legend_label(&self) -> &'static str {
        match self {
            NodeKind::Seed => "Seed link",
            NodeKind::External => "External link",
            NodeKind::Internal => "Internal link",
        }
    }
}

/// Undirected link graph plus the classification of every node.
///
/// Discovery edges and cross edges are stored the same way; the graph never
/// holds self-loops or parallel edges.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    graph: UnGraphMap<NodeId, ()>,
    kinds: BTreeMap<NodeId, NodeKind>,
}

impl LinkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` if it is new. The classification of an existing node is kept.
    pub fn add_node(&mut self, id: NodeId, kind: NodeKind) {
        if !self.graph.contains_node(id) {
            self.graph.add_node(id);
        }
        self.kinds.entry(id).or_insert(kind);
    }

    /// Adds the edge `a`-`b`. Returns `false` when nothing changed: the edge
    /// already existed or `a == b`.
    ///
    /// Endpoints that are not in the graph yet are added as internal nodes.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b || self.graph.contains_edge(a, b) {
            return false;
        }
        self.add_node(a, NodeKind::Internal);
        self.add_node(b, NodeKind::Internal);
        self.graph.add_edge(a, b, ());
        true
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.graph.contains_node(id)
    }

    pub fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.graph.contains_edge(a, b)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.kinds.get(&id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node ids in ascending order.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.kinds.keys().copied().collect()
    }

    /// Every edge once, with the smaller id first, sorted.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut edges: Vec<(NodeId, NodeId)> = self
            .graph
            .all_edges()
            .map(|(a, b, _)| if a <= b { (a, b) } else { (b, a) })
            .collect();
        edges.sort();
        edges
    }

    /// Neighbours of `id`, sorted.
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        if !self.graph.contains_node(id) {
            return Vec::new();
        }
        let mut neighbors: Vec<NodeId> = self.graph.neighbors(id).collect();
        neighbors.sort();
        neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node_is_idempotent_and_keeps_first_kind() {
        let mut graph = LinkGraph::new();
        graph.add_node(NodeId(1), NodeKind::External);
        graph.add_node(NodeId(1), NodeKind::Internal);

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.kind(NodeId(1)), Some(NodeKind::External));
    }

    #[test]
    fn test_add_edge_rejects_self_loop() {
        let mut graph = LinkGraph::new();
        graph.add_node(NodeId::SEED, NodeKind::Seed);

        assert!(!graph.add_edge(NodeId::SEED, NodeId::SEED));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_add_edge_is_idempotent_and_undirected() {
        let mut graph = LinkGraph::new();
        graph.add_node(NodeId(0), NodeKind::Seed);
        graph.add_node(NodeId(1), NodeKind::Internal);

        assert!(graph.add_edge(NodeId(0), NodeId(1)));
        assert!(!graph.add_edge(NodeId(1), NodeId(0)));
        assert!(!graph.add_edge(NodeId(0), NodeId(1)));

        assert_eq!(graph.edge_count(), 1);
        assert!(graph.contains_edge(NodeId(1), NodeId(0)));
        assert_eq!(graph.edges(), vec![(NodeId(0), NodeId(1))]);
    }

    #[test]
    fn test_add_edge_creates_missing_endpoints() {
        let mut graph = LinkGraph::new();
        graph.add_edge(NodeId(3), NodeId(2));

        assert!(graph.contains_node(NodeId(2)));
        assert!(graph.contains_node(NodeId(3)));
        assert_eq!(graph.kind(NodeId(3)), Some(NodeKind::Internal));
    }

    #[test]
    fn test_neighbors_sorted() {
        let mut graph = LinkGraph::new();
        graph.add_node(NodeId(0), NodeKind::Seed);
        graph.add_edge(NodeId(0), NodeId(3));
        graph.add_edge(NodeId(0), NodeId(1));
        graph.add_edge(NodeId(2), NodeId(0));

        assert_eq!(
            graph.neighbors(NodeId(0)),
            vec![NodeId(1), NodeId(2), NodeId(3)]
        );
        assert!(graph.neighbors(NodeId(9)).is_empty());
    }

    #[test]
    fn test_kind_colors() {
        assert_eq!(NodeKind::Seed.color(), "green");
        assert_eq!(NodeKind::External.color(), "yellow");
        assert_eq!(NodeKind::Internal.color(), "blue");
    }
}
