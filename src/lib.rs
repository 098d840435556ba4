// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Shortest routes and nearest points of interest over a static road network.
//!
//! A [Graph] is built once from dense node and edge arrays. Routes are found either with
//! plain [Dijkstra's algorithm](find_route), or with the
//! [ALT algorithm](find_route_alt) (A*, Landmarks, Triangle inequality), which uses
//! precomputed [LandmarkTables] to prune the search space. Landmark tables are expensive
//! to build, so they can be persisted in a compact binary cache and reloaded later.
//!
//! All per-search state lives in a [SearchContext], separate from the immutable [Graph].
//! One graph may be shared by many contexts, but a context serves one search at a time.
//!
//! # Example
//!
//! ```no_run
//! let nodes = altroute::loader::load_nodes_from_file("noder.txt").unwrap();
//! let edges = altroute::loader::load_edges_from_file("kanter.txt").unwrap();
//! let g = altroute::Graph::new(nodes, edges).unwrap();
//!
//! let tables = altroute::LandmarkTables::build(&g, &[0, 42, 1337]).unwrap();
//! let mut ctx = altroute::SearchContext::new(g.len());
//!
//! match altroute::find_route_alt(&g, &mut ctx, &tables, 7, 3000).unwrap() {
//!     Some(route) => println!("{} cs, {} nodes settled", route.distance, route.settled),
//!     None => println!("no route"),
//! }
//! ```

mod graph;
mod landmarks;
pub mod loader;
pub mod output;
mod search;
#[cfg(test)]
mod test_utils;

pub use graph::{Graph, GraphError};
pub use landmarks::{
    farthest_landmarks, CacheError, LandmarkTables, PreprocessError, MAX_LANDMARKS,
};
pub use search::{
    find_nearest_of_category, find_route, find_route_alt, one_to_all, Route, SearchContext,
    SearchError, MAX_NEAREST,
};

/// Dense, zero-based identifier of a [Node], equal to its position in the [Graph].
pub type NodeId = u32;

/// Travel cost of an [Edge], in whatever unit the edge data uses
/// (hundredths of a second for the bundled loaders).
pub type Weight = u32;

/// Distance of nodes which were not (yet) reached by a search.
///
/// Half of the integer range is used, so that adding an [Edge] weight or a heuristic
/// estimate to any finite distance never overflows. Edge weights and path totals must
/// stay below it: [Graph::new] rejects larger weights, and searches fail with
/// [SearchError::DistanceOverflow] instead of treating a longer path as missing.
pub const INFINITY: Weight = Weight::MAX / 2;

/// Represents a single location in the [Graph].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,

    /// Point-of-interest category of the node, or 0 if the node is not a point of interest.
    pub category: u32,
}

impl Node {
    /// Creates a [Node] without a point-of-interest category.
    pub const fn new(id: NodeId, lat: f64, lon: f64) -> Self {
        Self {
            id,
            lat,
            lon,
            category: 0,
        }
    }
}

/// Represents a one-way connection between two [Nodes](Node).
///
/// Weights are unsigned, as every search in this crate requires non-negative costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: Weight,
}
