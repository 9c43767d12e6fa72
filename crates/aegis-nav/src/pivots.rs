//! High-degree intersections along a route.
//!
//! Pivots are purely a visualization aid for the dispatch console; they play
//! no part in path computation.

use aegis_core::{GeoPoint, NodeId};
use aegis_spatial::RoadGraph;

/// Category tag carried by every pivot.
pub const PIVOT_CATEGORY: &str = "Pivot-k5";

const MIN_PIVOT_DEGREE: usize = 3;
const MAX_PIVOTS: usize = 2;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Pivot {
    pub node: NodeId,
    pub point: GeoPoint,
    pub out_degree: usize,
    pub category: String,
}

/// The first two path nodes (in travel order) with out-degree ≥ 3.
pub fn find_pivots(graph: &RoadGraph, nodes: &[NodeId]) -> Vec<Pivot> {
    nodes
        .iter()
        .filter(|n| graph.contains_node(**n))
        .map(|&n| (n, graph.out_degree(n)))
        .filter(|&(_, deg)| deg >= MIN_PIVOT_DEGREE)
        .take(MAX_PIVOTS)
        .map(|(node, out_degree)| Pivot {
            node,
            point: graph.node_pos[node.index()],
            out_degree,
            category: PIVOT_CATEGORY.to_string(),
        })
        .collect()
}
