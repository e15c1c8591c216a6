//! The layered proximity graph: an arena of nodes addressed by point id.
//!
//! Neighbor lists hold plain ids, so the (cyclic) neighbor relation never
//! involves owning references. A node's id is the position of its point in
//! the dataset the index was built from.

/// A node in the HNSW graph.
#[derive(Debug, Clone, PartialEq)]
pub struct HnswNode {
    /// Highest layer this node appears in.
    pub max_layer: usize,

    /// Neighbors per layer: `neighbors[layer]` = adjacent ids at that layer.
    pub neighbors: Vec<Vec<u32>>,
}

impl HnswNode {
    /// Create a node that lives on layers `0..=max_layer`.
    pub fn new(max_layer: usize) -> Self {
        Self {
            max_layer,
            neighbors: vec![Vec::new(); max_layer + 1],
        }
    }

    /// Neighbors at a layer; empty above the node's top layer.
    pub fn neighbors_at(&self, layer: usize) -> &[u32] {
        self.neighbors.get(layer).map_or(&[], Vec::as_slice)
    }
}

/// Arena of graph nodes, indexed by point id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HnswGraph {
    nodes: Vec<HnswNode>,
}

impl HnswGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Append a node, returning its id.
    pub fn push_node(&mut self, node: HnswNode) -> usize {
        let id = self.nodes.len();
        self.nodes.push(node);
        id
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes, indexed by id.
    pub fn nodes(&self) -> &[HnswNode] {
        &self.nodes
    }

    /// A node by id.
    pub fn node(&self, id: usize) -> &HnswNode {
        &self.nodes[id]
    }

    /// Neighbors of a node at a layer.
    pub fn neighbors(&self, id: usize, layer: usize) -> &[u32] {
        self.nodes[id].neighbors_at(layer)
    }

    /// Append `other` to a node's neighbor list at a layer.
    pub(crate) fn append_neighbor(&mut self, id: usize, layer: usize, other: u32) {
        self.nodes[id].neighbors[layer].push(other);
    }

    /// Remove and return the most recently appended neighbor at a layer.
    pub(crate) fn pop_neighbor(&mut self, id: usize, layer: usize) -> Option<u32> {
        self.nodes[id].neighbors[layer].pop()
    }

    /// Aggregate statistics over the graph.
    pub fn stats(&self) -> GraphStats {
        let max_layer = self.nodes.iter().map(|n| n.max_layer).max().unwrap_or(0);
        let mut edges_per_layer = vec![0usize; max_layer + 1];
        for node in &self.nodes {
            for (layer, neighbors) in node.neighbors.iter().enumerate() {
                edges_per_layer[layer] += neighbors.len();
            }
        }

        GraphStats {
            num_nodes: self.nodes.len(),
            max_layer,
            // Every edge is stored in both endpoints' lists.
            total_edges: edges_per_layer.iter().sum::<usize>() / 2,
            edges_per_layer,
        }
    }
}

/// Graph statistics.
#[derive(Debug, Clone, Default)]
pub struct GraphStats {
    pub num_nodes: usize,
    pub max_layer: usize,
    pub total_edges: usize,
    pub edges_per_layer: Vec<usize>,
}
