// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use log::debug;

use super::{check_node, Route, Search, SearchContext, SearchError, Zero};
use crate::{Graph, NodeId};

/// Uses [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)
/// to find the shortest route between two nodes in the provided graph.
///
/// Returns `Ok(None)` if there is no route between the two nodes.
/// After the search, `ctx` holds the distances of all settled nodes.
pub fn find_route(
    g: &Graph,
    ctx: &mut SearchContext,
    from: NodeId,
    to: NodeId,
) -> Result<Option<Route>, SearchError> {
    check_node(g, from)?;
    check_node(g, to)?;

    let route = Search::new(g, ctx, &[from], Zero).run_to(to)?;
    match route {
        Some(ref r) => debug!(
            "dijkstra {} -> {}: distance {}, {} nodes settled",
            from, to, r.distance, r.settled
        ),
        None => debug!("dijkstra {} -> {}: no route", from, to),
    }
    Ok(route)
}

/// Runs [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)
/// from `from` until every reachable node is settled.
///
/// Distances are left in `ctx` ([INFINITY](crate::INFINITY) for unreachable nodes).
/// Returns the number of settled nodes.
pub fn one_to_all(g: &Graph, ctx: &mut SearchContext, from: NodeId) -> Result<usize, SearchError> {
    check_node(g, from)?;

    let mut search = Search::new(g, ctx, &[from], Zero);
    while search.settle_next()?.is_some() {}
    Ok(search.settled())
}
