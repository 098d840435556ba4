// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::NodeId;

/// Error conditions which may occur when starting or running a search.
///
/// Failing to find a route is not an error: point-to-point searches
/// return `Ok(None)` in that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The start or end node doesn't exist in a graph.
    #[error("invalid node: {0}")]
    InvalidReference(NodeId),

    /// [LandmarkTables](crate::LandmarkTables) were computed for a different graph.
    #[error("landmark tables cover {tables} nodes, but the graph has {graph}")]
    TableWidthMismatch { tables: usize, graph: usize },

    /// A path to the node is at least [INFINITY](crate::INFINITY) long,
    /// and can't be told apart from an unreachable node.
    #[error("distance to node {0} is too large to represent")]
    DistanceOverflow(NodeId),
}
