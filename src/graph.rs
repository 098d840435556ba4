// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{Edge, Node, NodeId, Weight, INFINITY};

/// Error returned when a [Graph] can't be built from the provided nodes and edges,
/// or when a non-existing node is modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Nodes must be dense: the node at position `i` needs to have `id == i`.
    #[error("node at position {position} has id {id}")]
    NodeIdMismatch { position: usize, id: NodeId },

    #[error("edge {from} -> {to} refers to a node outside of the graph ({node_count} nodes)")]
    DanglingEdge {
        from: NodeId,
        to: NodeId,
        node_count: usize,
    },

    /// Edge weights must stay below [INFINITY], which marks unreachable nodes.
    #[error("edge {from} -> {to} has weight {weight}, which is not below {INFINITY}")]
    WeightTooLarge {
        from: NodeId,
        to: NodeId,
        weight: Weight,
    },

    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
}

/// Represents a road network as a dense array of [Nodes](Node) and
/// the [Edges](Edge) between them.
///
/// Edges are kept in a single array, grouped by their source node.
/// `first_edge[i]..first_edge[i + 1]` is the range of edges outgoing from node `i`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
    first_edge: Vec<usize>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Builds a graph from dense nodes and edges between them.
    ///
    /// The order of edges in the input doesn't matter. Every edge weight must be
    /// below [INFINITY]; searches additionally fail with
    /// [DistanceOverflow](crate::SearchError::DistanceOverflow) if a path total reaches it.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        for (position, node) in nodes.iter().enumerate() {
            if node.id as usize != position {
                return Err(GraphError::NodeIdMismatch {
                    position,
                    id: node.id,
                });
            }
        }

        let node_count = nodes.len();
        if let Some(e) = edges
            .iter()
            .find(|e| e.from as usize >= node_count || e.to as usize >= node_count)
        {
            return Err(GraphError::DanglingEdge {
                from: e.from,
                to: e.to,
                node_count,
            });
        }

        if let Some(e) = edges.iter().find(|e| e.weight >= INFINITY) {
            return Err(GraphError::WeightTooLarge {
                from: e.from,
                to: e.to,
                weight: e.weight,
            });
        }

        Ok(Self::from_valid_parts(nodes, edges))
    }

    fn from_valid_parts(nodes: Vec<Node>, mut edges: Vec<Edge>) -> Self {
        edges.sort_by_key(|e| e.from);

        let mut first_edge = vec![0; nodes.len() + 1];
        for e in &edges {
            first_edge[e.from as usize + 1] += 1;
        }
        for i in 1..first_edge.len() {
            first_edge[i] += first_edge[i - 1];
        }

        Self {
            nodes,
            first_edge,
            edges,
        }
    }

    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the total number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns an iterator over all [Nodes](Node), ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Returns all [Edges](Edge) in the graph, grouped by their source node.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Retrieves a [Node] with the provided id.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// Retrieves a [Node] with the provided id.
    ///
    /// Panics if the node doesn't exist.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    /// Gets all outgoing [Edges](Edge) from a node with the given id.
    ///
    /// Panics if the node doesn't exist.
    pub fn get_edges(&self, from: NodeId) -> &[Edge] {
        let from = from as usize;
        &self.edges[self.first_edge[from]..self.first_edge[from + 1]]
    }

    /// Sets the point-of-interest category of a node.
    pub fn set_category(&mut self, id: NodeId, category: u32) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(id as usize)
            .ok_or(GraphError::UnknownNode(id))?;
        node.category = category;
        Ok(())
    }

    /// Creates an independent copy of the graph with every edge flipped.
    ///
    /// Nodes of the reversed graph only keep their ids and positions;
    /// point-of-interest categories are not copied.
    pub fn reverse(&self) -> Self {
        let nodes = self
            .nodes
            .iter()
            .map(|n| Node::new(n.id, n.lat, n.lon))
            .collect();

        let edges = self
            .edges
            .iter()
            .map(|e| Edge {
                from: e.to,
                to: e.from,
                weight: e.weight,
            })
            .collect();

        Self::from_valid_parts(nodes, edges)
    }
}
