// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use log::{debug, info};

use crate::search::{Search, SearchContext, SearchError, Zero};
use crate::{one_to_all, Graph, NodeId, Weight};

mod cache;

pub use cache::CacheError;

/// Maximum number of landmarks, limited by the one-byte count in the cache file.
pub const MAX_LANDMARKS: usize = u8::MAX as usize;

/// Error which can occur when computing [LandmarkTables].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PreprocessError {
    #[error("too many landmarks: {0} > {MAX_LANDMARKS}")]
    TooManyLandmarks(usize),

    #[error("landmark: {0}")]
    Search(#[from] SearchError),
}

/// Shortest distances between a set of landmarks and every node of a [Graph].
///
/// Both tables are stored row-major, one row of [width](LandmarkTables::width)
/// entries per landmark. Unreachable nodes have a distance of [INFINITY](crate::INFINITY).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandmarkTables {
    landmarks: Vec<NodeId>,
    width: usize,

    /// `from_landmark[l * width + n]` - distance from landmark `l` to node `n`.
    from_landmark: Vec<Weight>,

    /// `to_landmark[l * width + n]` - distance from node `n` to landmark `l`.
    to_landmark: Vec<Weight>,
}

impl LandmarkTables {
    /// Computes the distances from and to every landmark.
    ///
    /// Distances from landmarks are found by running [one_to_all] over `g`,
    /// while distances to landmarks by running it over the [reversed](Graph::reverse) `g`.
    pub fn build(g: &Graph, landmarks: &[NodeId]) -> Result<Self, PreprocessError> {
        if landmarks.len() > MAX_LANDMARKS {
            return Err(PreprocessError::TooManyLandmarks(landmarks.len()));
        }
        if let Some(&invalid) = landmarks.iter().find(|&&l| g.get_node(l).is_none()) {
            return Err(SearchError::InvalidReference(invalid).into());
        }

        info!(
            "computing landmark tables for {} landmarks over {} nodes",
            landmarks.len(),
            g.len()
        );

        let from_landmark = distance_rows(g, landmarks, "from")?;
        let to_landmark = {
            let reversed = g.reverse();
            distance_rows(&reversed, landmarks, "to")?
        };

        info!("landmark tables computed");
        Ok(Self {
            landmarks: landmarks.to_vec(),
            width: g.len(),
            from_landmark,
            to_landmark,
        })
    }

    /// Assembles tables from already-computed parts. Both tables must have
    /// `landmarks.len() * width` entries.
    pub(crate) fn from_parts(
        landmarks: Vec<NodeId>,
        width: usize,
        from_landmark: Vec<Weight>,
        to_landmark: Vec<Weight>,
    ) -> Self {
        debug_assert_eq!(from_landmark.len(), landmarks.len() * width);
        debug_assert_eq!(to_landmark.len(), landmarks.len() * width);
        Self {
            landmarks,
            width,
            from_landmark,
            to_landmark,
        }
    }

    /// Ids of landmark nodes, in table row order.
    pub fn landmarks(&self) -> &[NodeId] {
        &self.landmarks
    }

    /// Number of entries in every row - the number of nodes in the graph
    /// the tables were computed for.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Distances from the `i`-th landmark to every node.
    pub fn from_landmark(&self, i: usize) -> &[Weight] {
        &self.from_landmark[i * self.width..(i + 1) * self.width]
    }

    /// Distances from every node to the `i`-th landmark.
    pub fn to_landmark(&self, i: usize) -> &[Weight] {
        &self.to_landmark[i * self.width..(i + 1) * self.width]
    }

    /// Lower bound of the distance from `node` to `target`.
    ///
    /// For every landmark `l`, by the triangle inequality:
    /// `d(node, target) >= d(l, target) - d(l, node)` and
    /// `d(node, target) >= d(node, l) - d(target, l)`.
    /// The largest of those bounds is returned, or zero if there are no landmarks.
    pub fn estimate(&self, node: NodeId, target: NodeId) -> Weight {
        let (node, target) = (node as usize, target as usize);

        (0..self.landmarks.len())
            .map(|i| {
                let from = self.from_landmark(i);
                let to = self.to_landmark(i);
                let forward = from[target].saturating_sub(from[node]);
                let backward = to[node].saturating_sub(to[target]);
                forward.max(backward)
            })
            .max()
            .unwrap_or(0)
    }
}

/// Runs [one_to_all] from every landmark, and concatenates the resulting distances.
fn distance_rows(
    g: &Graph,
    landmarks: &[NodeId],
    direction: &str,
) -> Result<Vec<Weight>, SearchError> {
    let mut ctx = SearchContext::new(g.len());
    let mut rows = Vec::with_capacity(landmarks.len() * g.len());

    for (i, &landmark) in landmarks.iter().enumerate() {
        let settled = one_to_all(g, &mut ctx, landmark)?;
        debug!(
            "distances {} landmark {} ({}/{}): {} nodes reached",
            direction,
            landmark,
            i + 1,
            landmarks.len(),
            settled
        );
        rows.extend_from_slice(ctx.distances());
    }

    Ok(rows)
}

/// Picks `count` landmarks spread over the graph.
///
/// The first landmark is the node furthest away from `initial`. Every next landmark
/// is the node furthest away from all landmarks picked so far. Fewer landmarks are
/// returned if the reachable part of the graph is too small.
pub fn farthest_landmarks(
    g: &Graph,
    count: usize,
    initial: NodeId,
) -> Result<Vec<NodeId>, PreprocessError> {
    if count > MAX_LANDMARKS {
        return Err(PreprocessError::TooManyLandmarks(count));
    }
    if g.get_node(initial).is_none() {
        return Err(SearchError::InvalidReference(initial).into());
    }

    let mut ctx = SearchContext::new(g.len());
    let mut landmarks: Vec<NodeId> = Vec::with_capacity(count);
    let mut sources = vec![initial];

    while landmarks.len() < count {
        let mut search = Search::new(g, &mut ctx, &sources, Zero);
        let mut last = initial;
        while let Some(node) = search.settle_next()? {
            last = node;
        }

        if landmarks.contains(&last) {
            break;
        }
        landmarks.push(last);
        sources.clone_from(&landmarks);
    }

    debug!("picked landmarks {:?}", landmarks);
    Ok(landmarks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{disconnected_graph, grid_graph, line_graph};
    use crate::{find_route, INFINITY};

    #[test]
    fn line_tables() {
        let g = line_graph();
        let tables = LandmarkTables::build(&g, &[1, 3]).unwrap();

        assert_eq!(tables.landmarks(), &[1, 3]);
        assert_eq!(tables.width(), 4);
        assert_eq!(tables.from_landmark(0), &[INFINITY, 0, 5, 10]);
        assert_eq!(tables.from_landmark(1), &[INFINITY, INFINITY, INFINITY, 0]);
        assert_eq!(tables.to_landmark(0), &[5, 0, INFINITY, INFINITY]);
        assert_eq!(tables.to_landmark(1), &[15, 10, 5, 0]);
    }

    #[test]
    fn to_landmark_matches_direct_search() {
        let g = grid_graph(7, 6);
        let landmarks = [0, 6, 41, 20];
        let tables = LandmarkTables::build(&g, &landmarks).unwrap();
        let mut ctx = SearchContext::new(g.len());

        for (i, &landmark) in landmarks.iter().enumerate() {
            for node in (0..g.len() as NodeId).step_by(3) {
                let route = find_route(&g, &mut ctx, node, landmark).unwrap().unwrap();
                assert_eq!(tables.to_landmark(i)[node as usize], route.distance);

                let route = find_route(&g, &mut ctx, landmark, node).unwrap().unwrap();
                assert_eq!(tables.from_landmark(i)[node as usize], route.distance);
            }
        }
    }

    #[test]
    fn estimate_is_admissible() {
        let g = grid_graph(8, 8);
        let tables = LandmarkTables::build(&g, &[0, 7, 56, 63]).unwrap();
        let mut ctx = SearchContext::new(g.len());

        for target in [0, 19, 36, 63] {
            for node in 0..g.len() as NodeId {
                let route = find_route(&g, &mut ctx, node, target).unwrap().unwrap();
                assert!(tables.estimate(node, target) <= route.distance);
            }
            assert_eq!(tables.estimate(target, target), 0);
        }
    }

    #[test]
    fn estimate_without_landmarks() {
        let g = line_graph();
        let tables = LandmarkTables::build(&g, &[]).unwrap();
        assert_eq!(tables.estimate(0, 3), 0);
    }

    #[test]
    fn build_rejects_invalid_landmarks() {
        let g = line_graph();
        assert_eq!(
            LandmarkTables::build(&g, &[0, 4]),
            Err(PreprocessError::Search(SearchError::InvalidReference(4)))
        );
        assert_eq!(
            LandmarkTables::build(&g, &[0; 256]),
            Err(PreprocessError::TooManyLandmarks(256))
        );
    }

    #[test]
    fn farthest_landmarks_on_line() {
        let g = disconnected_graph();
        assert_eq!(farthest_landmarks(&g, 3, 0), Ok(vec![1, 0]));

        let g = line_graph();
        assert_eq!(farthest_landmarks(&g, 1, 0), Ok(vec![3]));
    }

    #[test]
    fn farthest_landmarks_are_distinct() {
        let g = grid_graph(9, 9);
        let landmarks = farthest_landmarks(&g, 4, 40).unwrap();

        assert_eq!(landmarks.len(), 4);
        let mut deduped = landmarks.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), 4);
    }
}
