// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use log::debug;

use super::{check_node, Potential, Route, Search, SearchContext, SearchError};
use crate::{Graph, LandmarkTables, NodeId, Weight};

/// Lower bound on the distance to a fixed target, derived from landmark distances.
struct LandmarkPotential<'a> {
    tables: &'a LandmarkTables,
    target: NodeId,
}

impl Potential for LandmarkPotential<'_> {
    #[inline]
    fn potential(&mut self, node: NodeId) -> Weight {
        self.tables.estimate(node, self.target)
    }
}

/// Uses the ALT algorithm (A* with Landmarks and the Triangle inequality)
/// to find the shortest route between two nodes in the provided graph.
///
/// Produces routes as short as [find_route](crate::find_route), but usually settles
/// far fewer nodes. `tables` must have been computed for `g`.
///
/// Returns `Ok(None)` if there is no route between the two nodes.
pub fn find_route_alt(
    g: &Graph,
    ctx: &mut SearchContext,
    tables: &LandmarkTables,
    from: NodeId,
    to: NodeId,
) -> Result<Option<Route>, SearchError> {
    check_node(g, from)?;
    check_node(g, to)?;
    if tables.width() != g.len() {
        return Err(SearchError::TableWidthMismatch {
            tables: tables.width(),
            graph: g.len(),
        });
    }

    let potential = LandmarkPotential { tables, target: to };
    let route = Search::new(g, ctx, &[from], potential).run_to(to)?;
    match route {
        Some(ref r) => debug!(
            "alt {} -> {}: distance {}, {} nodes settled",
            from, to, r.distance, r.settled
        ),
        None => debug!("alt {} -> {}: no route", from, to),
    }
    Ok(route)
}
