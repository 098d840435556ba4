// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{Edge, Graph, Node, NodeId, Weight};

pub fn edge(from: NodeId, to: NodeId, weight: Weight) -> Edge {
    Edge { from, to, weight }
}

/// 0 ─5→ 1 ─5→ 2 ─5→ 3
pub fn line_graph() -> Graph {
    let nodes = (0..4)
        .map(|i| Node::new(i, 63.0 + i as f64 * 0.1, 10.0))
        .collect();
    Graph::new(nodes, vec![edge(0, 1, 5), edge(1, 2, 5), edge(2, 3, 5)]).unwrap()
}

/// Graph with two components: 0 ⇄ 1 and 2 ⇄ 3.
pub fn disconnected_graph() -> Graph {
    let nodes = (0..4).map(|i| Node::new(i, 0.0, i as f64)).collect();
    Graph::new(
        nodes,
        vec![edge(0, 1, 3), edge(1, 0, 3), edge(2, 3, 3), edge(3, 2, 3)],
    )
    .unwrap()
}

/// Pseudo-random, but deterministic, weights in `1..=100`.
fn grid_weight(from: NodeId, to: NodeId) -> Weight {
    let x = (from as u64 * 7919 + to as u64 * 104_729 + 13) % 1_000_003;
    (x % 100) as Weight + 1
}

/// Builds a `width` × `height` grid. Horizontal streets go both ways,
/// while every third vertical street is one-way (downwards).
/// Costs differ in each direction.
pub fn grid_graph(width: u32, height: u32) -> Graph {
    let id = |x: u32, y: u32| y * width + x;

    let nodes = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| Node::new(id(x, y), 50.0 + y as f64 * 0.01, 5.0 + x as f64 * 0.01))
        .collect();

    let mut edges = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let here = id(x, y);
            if x + 1 < width {
                let right = id(x + 1, y);
                edges.push(edge(here, right, grid_weight(here, right)));
                edges.push(edge(right, here, grid_weight(right, here)));
            }
            if y + 1 < height {
                let down = id(x, y + 1);
                edges.push(edge(here, down, grid_weight(here, down)));
                if x % 3 != 0 {
                    edges.push(edge(down, here, grid_weight(down, here)));
                }
            }
        }
    }

    Graph::new(nodes, edges).unwrap()
}
