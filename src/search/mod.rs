// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::{Graph, NodeId, Weight, INFINITY};

mod alt;
mod dijkstra;
mod error;
mod nearest;

pub use alt::find_route_alt;
pub use dijkstra::{find_route, one_to_all};
pub use error::SearchError;
pub use nearest::{find_nearest_of_category, MAX_NEAREST};

/// Outcome of a successful point-to-point search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// The node at which the search has stopped.
    pub target: NodeId,

    /// Total cost of the route.
    pub distance: Weight,

    /// Number of nodes settled by the search, including the start and the target.
    pub settled: usize,

    /// Nodes of the route, from the start to the target (inclusive).
    pub path: Vec<NodeId>,
}

impl Route {
    /// Returns (latitude, longitude) pairs of the route, walking from the target
    /// back towards the start. The start node itself is not included.
    pub fn coordinates(&self, g: &Graph) -> Vec<(f64, f64)> {
        self.path
            .iter()
            .rev()
            .take(self.path.len().saturating_sub(1))
            .map(|&id| {
                let node = g.node(id);
                (node.lat, node.lon)
            })
            .collect()
    }
}

/// Per-node scratch state of a single search, indexed by [NodeId].
///
/// Keeping this state outside of the [Graph] allows one graph to be queried
/// through multiple contexts. Reusing a context between searches avoids
/// re-allocating its arrays.
#[derive(Debug, Default, Clone)]
pub struct SearchContext {
    distance: Vec<Weight>,
    predecessor: Vec<Option<NodeId>>,
    settled: Vec<bool>,
    enqueued: Vec<bool>,
    estimate: Vec<Weight>,
}

impl SearchContext {
    /// Creates a context for a graph with `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            distance: vec![INFINITY; node_count],
            predecessor: vec![None; node_count],
            settled: vec![false; node_count],
            enqueued: vec![false; node_count],
            estimate: vec![0; node_count],
        }
    }

    /// Returns the number of nodes covered by this context.
    pub fn len(&self) -> usize {
        self.distance.len()
    }

    /// Returns `true` if this context doesn't cover any nodes.
    pub fn is_empty(&self) -> bool {
        self.distance.is_empty()
    }

    /// Resets the state of every node, and marks `start` as the only discovered node,
    /// at distance zero.
    ///
    /// Panics if `start` is outside of the context.
    pub fn initialize(&mut self, start: NodeId) {
        self.distance.fill(INFINITY);
        self.predecessor.fill(None);
        self.settled.fill(false);
        self.enqueued.fill(false);
        self.estimate.fill(0);

        self.distance[start as usize] = 0;
        self.enqueued[start as usize] = true;
    }

    fn resize(&mut self, node_count: usize) {
        if self.len() != node_count {
            *self = Self::new(node_count);
        }
    }

    /// Marks another node as a search source at distance zero.
    fn add_source(&mut self, source: NodeId) {
        self.distance[source as usize] = 0;
        self.predecessor[source as usize] = None;
        self.enqueued[source as usize] = true;
    }

    /// Best known distance to a node, or [INFINITY] if it was not reached.
    pub fn distance(&self, node: NodeId) -> Weight {
        self.distance[node as usize]
    }

    /// Best known distances of all nodes, indexed by [NodeId].
    pub fn distances(&self) -> &[Weight] {
        &self.distance
    }

    /// Node preceding `node` on its best known path.
    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.predecessor[node as usize]
    }

    pub fn is_settled(&self, node: NodeId) -> bool {
        self.settled[node as usize]
    }

    pub fn is_enqueued(&self, node: NodeId) -> bool {
        self.enqueued[node as usize]
    }

    /// Cached heuristic estimate of the remaining distance from `node`.
    /// Always zero outside of [find_route_alt].
    pub fn estimate(&self, node: NodeId) -> Weight {
        self.estimate[node as usize]
    }

    /// Follows predecessors from `last` and returns the path from the search source
    /// to `last` (inclusive).
    pub fn path_to(&self, mut last: NodeId) -> Vec<NodeId> {
        let mut path = vec![last];

        while let Some(nd) = self.predecessor(last) {
            path.push(nd);
            last = nd;
        }

        path.reverse();
        return path;
    }
}

/// Lower bound on the remaining cost from a node to the search target.
pub(crate) trait Potential {
    fn potential(&mut self, node: NodeId) -> Weight;
}

/// Potential of plain Dijkstra searches.
pub(crate) struct Zero;

impl Potential for Zero {
    #[inline]
    fn potential(&mut self, _: NodeId) -> Weight {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueueItem {
    key: Weight,
    at: NodeId,
}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // NOTE: We revert the order of comparison, as lower keys (and on ties, lower ids)
        // are considered better ("higher"), and Rust's BinaryHeap is a max-heap.
        other.key.cmp(&self.key).then_with(|| other.at.cmp(&self.at))
    }
}

/// State of a single running search: the graph, the per-node context
/// and the frontier of discovered but not yet settled nodes.
///
/// The frontier has no decrease-key operation. Every improvement pushes a new item,
/// and outdated items are skipped once popped.
///
/// Edges leading to distances of [INFINITY] or more are not relaxed. Their target nodes
/// are remembered, and if any of them is still not settled once the frontier is exhausted,
/// the search is reported as incomplete.
pub(crate) struct Search<'a, P: Potential> {
    g: &'a Graph,
    ctx: &'a mut SearchContext,
    queue: BinaryHeap<QueueItem>,
    potential: P,
    settled: usize,
    overflow: Vec<NodeId>,
}

impl<'a, P: Potential> Search<'a, P> {
    /// Prepares a search from the provided sources. The first source is required.
    pub(crate) fn new(
        g: &'a Graph,
        ctx: &'a mut SearchContext,
        sources: &[NodeId],
        mut potential: P,
    ) -> Self {
        ctx.resize(g.len());
        ctx.initialize(sources[0]);

        let mut queue = BinaryHeap::default();
        for &source in sources {
            ctx.add_source(source);
            let estimate = potential.potential(source);
            ctx.estimate[source as usize] = estimate;
            queue.push(QueueItem {
                key: estimate,
                at: source,
            });
        }

        Self {
            g,
            ctx,
            queue,
            potential,
            settled: 0,
            overflow: Vec::new(),
        }
    }

    /// Number of nodes settled so far.
    pub(crate) fn settled(&self) -> usize {
        self.settled
    }

    /// Pops the closest node from the frontier, relaxes its outgoing edges
    /// and marks it as settled. Returns `None` once the frontier is exhausted,
    /// or [SearchError::DistanceOverflow] if some node was left out because
    /// its distance couldn't be represented.
    pub(crate) fn settle_next(&mut self) -> Result<Option<NodeId>, SearchError> {
        while let Some(item) = self.queue.pop() {
            if self.ctx.settled[item.at as usize] {
                continue;
            }

            self.relax(item.at);
            self.ctx.settled[item.at as usize] = true;
            self.settled += 1;
            return Ok(Some(item.at));
        }

        match self.overflow.iter().find(|&&n| !self.ctx.settled[n as usize]) {
            Some(&node) => Err(SearchError::DistanceOverflow(node)),
            None => Ok(None),
        }
    }

    fn relax(&mut self, at: NodeId) {
        let g = self.g;
        let at_distance = self.ctx.distance[at as usize];

        for edge in g.get_edges(at) {
            let to = edge.to as usize;
            if self.ctx.settled[to] {
                continue;
            }

            let distance = at_distance.saturating_add(edge.weight);
            if distance >= INFINITY {
                self.overflow.push(edge.to);
                continue;
            }

            if !self.ctx.enqueued[to] {
                self.ctx.estimate[to] = self.potential.potential(edge.to);
                self.ctx.enqueued[to] = true;
            }

            if distance < self.ctx.distance[to] {
                self.ctx.distance[to] = distance;
                self.ctx.predecessor[to] = Some(at);
                self.queue.push(QueueItem {
                    key: distance.saturating_add(self.ctx.estimate[to]),
                    at: edge.to,
                });
            }
        }
    }

    /// Settles nodes until `target` is reached.
    /// Returns `None` if the frontier was exhausted before that.
    pub(crate) fn run_to(mut self, target: NodeId) -> Result<Option<Route>, SearchError> {
        while let Some(at) = self.settle_next()? {
            if at == target {
                return Ok(Some(Route {
                    target,
                    distance: self.ctx.distance(target),
                    settled: self.settled,
                    path: self.ctx.path_to(target),
                }));
            }
        }
        Ok(None)
    }
}

/// Ensures that a query endpoint exists in the graph.
pub(crate) fn check_node(g: &Graph, id: NodeId) -> Result<(), SearchError> {
    g.get_node(id)
        .map(|_| ())
        .ok_or(SearchError::InvalidReference(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{edge, line_graph};
    use crate::Node;

    #[test]
    fn initialize_resets_previous_search() {
        let g = line_graph();
        let mut ctx = SearchContext::new(g.len());
        find_route(&g, &mut ctx, 0, 3).unwrap();
        assert!(ctx.is_settled(2));

        ctx.initialize(1);
        assert_eq!(ctx.distance(1), 0);
        assert!(ctx.is_enqueued(1));
        assert!(!ctx.is_settled(1));
        for n in [0, 2, 3] {
            assert_eq!(ctx.distance(n), INFINITY);
            assert_eq!(ctx.predecessor(n), None);
            assert!(!ctx.is_settled(n));
            assert!(!ctx.is_enqueued(n));
        }
    }

    #[test]
    fn context_adapts_to_graph_size() {
        let g = line_graph();
        let mut ctx = SearchContext::default();
        let route = find_route(&g, &mut ctx, 0, 2).unwrap().unwrap();
        assert_eq!(ctx.len(), 4);
        assert_eq!(route.distance, 10);
    }

    #[test]
    fn distances_up_to_infinity() {
        let nodes = (0..3).map(|i| Node::new(i, 0.0, i as f64)).collect();
        let g = Graph::new(nodes, vec![edge(0, 1, INFINITY - 1), edge(1, 2, 1)]).unwrap();
        let mut ctx = SearchContext::new(g.len());

        let route = find_route(&g, &mut ctx, 0, 1).unwrap().unwrap();
        assert_eq!(route.distance, INFINITY - 1);
        assert_eq!(
            find_route(&g, &mut ctx, 0, 2),
            Err(SearchError::DistanceOverflow(2))
        );
    }

    #[test]
    fn long_paths_are_not_reported_as_unreachable() {
        let nodes = (0..3).map(|i| Node::new(i, 0.0, i as f64)).collect();
        let g = Graph::new(nodes, vec![edge(0, 1, 1 << 30), edge(1, 2, 1 << 30)]).unwrap();
        let mut ctx = SearchContext::new(g.len());

        assert_eq!(
            find_route(&g, &mut ctx, 0, 2),
            Err(SearchError::DistanceOverflow(2))
        );
        assert_eq!(
            one_to_all(&g, &mut ctx, 0),
            Err(SearchError::DistanceOverflow(2))
        );
    }

    #[test]
    fn overflowing_edge_ignored_when_node_is_reachable_otherwise() {
        let nodes = (0..4).map(|i| Node::new(i, 0.0, i as f64)).collect();
        let edges = vec![
            edge(0, 1, 1 << 30),
            edge(1, 2, 1 << 30),
            edge(0, 3, (1 << 30) + 1),
            edge(3, 2, 1),
        ];
        let g = Graph::new(nodes, edges).unwrap();
        let mut ctx = SearchContext::new(g.len());

        assert_eq!(one_to_all(&g, &mut ctx, 0), Ok(4));
        assert_eq!(ctx.distance(2), (1 << 30) + 2);
        assert_eq!(ctx.predecessor(2), Some(3));
    }

    #[test]
    fn queue_pops_lowest_key_then_lowest_id() {
        let mut queue = BinaryHeap::new();
        queue.push(QueueItem { key: 5, at: 1 });
        queue.push(QueueItem { key: 3, at: 7 });
        queue.push(QueueItem { key: 5, at: 0 });
        queue.push(QueueItem { key: 3, at: 2 });

        let order: Vec<_> = std::iter::from_fn(|| queue.pop().map(|i| i.at)).collect();
        assert_eq!(order, vec![2, 7, 0, 1]);
    }

    #[test]
    fn route_coordinates_skip_start() {
        let g = line_graph();
        let route = Route {
            target: 3,
            distance: 15,
            settled: 4,
            path: vec![0, 1, 2, 3],
        };
        let lats: Vec<_> = route.coordinates(&g).iter().map(|&(lat, _)| lat).collect();
        assert_eq!(lats, vec![g.node(3).lat, g.node(2).lat, g.node(1).lat]);
    }
}
