//! Built-in [`GraphProvider`] over a preloaded regional graph.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use aegis_core::{BoundingBox, NodeId};

use crate::corridor::GraphProvider;
use crate::network::{RoadGraph, RoadGraphBuilder};
use crate::{SpatialError, SpatialResult};

/// Serves corridors by clipping one large in-memory graph (a city or
/// county extract) to the requested rectangle.
///
/// Nodes inside the rectangle are kept; an edge is kept when both of its
/// end nodes are.  `NodeId`s are renumbered densely in the clipped graph.
pub struct ClippingProvider {
    region: Arc<RoadGraph>,
}

impl ClippingProvider {
    pub fn new(region: Arc<RoadGraph>) -> Self {
        Self { region }
    }

    pub fn region(&self) -> &RoadGraph {
        &self.region
    }
}

impl GraphProvider for ClippingProvider {
    fn load(&self, bbox: &BoundingBox) -> SpatialResult<RoadGraph> {
        let region = &self.region;
        let mut b = RoadGraphBuilder::new();
        let mut remap: FxHashMap<NodeId, NodeId> = FxHashMap::default();

        for (i, &pos) in region.node_pos.iter().enumerate() {
            if bbox.contains(pos) {
                remap.insert(NodeId(i as u32), b.add_node(pos));
            }
        }
        if remap.is_empty() {
            return Err(SpatialError::GraphUnavailable(format!("no road nodes inside {bbox}")));
        }

        for i in 0..region.edge_count() {
            let from = remap.get(&region.edge_from[i]);
            let to = remap.get(&region.edge_to[i]);
            if let (Some(&from), Some(&to)) = (from, to) {
                b.add_directed_edge(from, to, region.edge_length_m[i], region.edge_attrs[i].clone());
            }
        }

        Ok(b.build())
    }
}
