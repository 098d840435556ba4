// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use log::debug;

use super::{check_node, Search, SearchContext, SearchError, Zero};
use crate::{Graph, NodeId};

/// Maximum number of nodes returned by [find_nearest_of_category].
pub const MAX_NEAREST: usize = 10;

/// Finds up to [MAX_NEAREST] nodes with the given point-of-interest `category`
/// closest to `from`, ordered by increasing distance.
///
/// The start node is included if it matches. Distances of returned nodes
/// can be read from `ctx` after the search.
pub fn find_nearest_of_category(
    g: &Graph,
    ctx: &mut SearchContext,
    from: NodeId,
    category: u32,
) -> Result<Vec<NodeId>, SearchError> {
    check_node(g, from)?;

    let mut found = Vec::with_capacity(MAX_NEAREST);
    let mut search = Search::new(g, ctx, &[from], Zero);

    while let Some(at) = search.settle_next()? {
        if g.node(at).category == category {
            found.push(at);
            if found.len() >= MAX_NEAREST {
                break;
            }
        }
    }

    debug!(
        "nearest of category {} from {}: {} found, {} nodes settled",
        category,
        from,
        found.len(),
        search.settled()
    );
    Ok(found)
}
