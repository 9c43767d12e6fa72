//! Dynamic road closures.
//!
//! A closure is a point reported by dispatch (collision, fire, flooding)
//! with a fixed blocking radius.  Filtering produces a new graph with the
//! blocked edges removed; the cached corridor graph is never touched, so
//! other in-flight requests and the destination tree keep using it.

use aegis_core::{EdgeId, GeoPoint};
use tracing::debug;

use crate::network::RoadGraph;

/// Default blocking radius around a closure point, in metres.
pub const DEFAULT_CLOSURE_RADIUS_M: f64 = 200.0;

/// Removes edges near closure points.
#[derive(Copy, Clone, Debug)]
pub struct ClosureFilter {
    radius_m: f64,
}

impl Default for ClosureFilter {
    fn default() -> Self {
        Self { radius_m: DEFAULT_CLOSURE_RADIUS_M }
    }
}

impl ClosureFilter {
    pub fn new(radius_m: f64) -> Self {
        Self { radius_m }
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// `true` if any closure point lies strictly within the radius of the
    /// edge's start node, end node, or their midpoint.
    pub fn is_blocked(&self, graph: &RoadGraph, edge: EdgeId, closures: &[GeoPoint]) -> bool {
        let a = graph.node_pos[graph.edge_from[edge.index()].index()];
        let b = graph.node_pos[graph.edge_to[edge.index()].index()];
        let mid = a.midpoint(b);
        closures.iter().any(|&c| {
            c.distance_m(a) < self.radius_m
                || c.distance_m(b) < self.radius_m
                || c.distance_m(mid) < self.radius_m
        })
    }

    /// Derive a copy of `graph` without the blocked edges.  Node ids are
    /// preserved, so endpoints snapped on the base graph stay valid.
    pub fn apply(&self, graph: &RoadGraph, closures: &[GeoPoint]) -> RoadGraph {
        let filtered = graph.retain_edges(|e| !self.is_blocked(graph, e, closures));
        debug!(
            closures = closures.len(),
            removed = graph.edge_count() - filtered.edge_count(),
            "applied road closures"
        );
        filtered
    }
}
