//! Expand a node path into drawable coordinates.
//!
//! Each hop uses the shortest parallel edge between its two nodes.  Edges
//! with recorded geometry contribute their shape; edges without one are a
//! straight segment between the node positions.  Every hop is also recorded
//! as an [`EdgeSpan`] so later stages can attribute distance, time and street
//! names to point ranges.

use aegis_core::{EdgeId, GeoPoint, NodeId, Scenario};
use aegis_spatial::{EdgeAttrs, RoadGraph};

use crate::speed::edge_speed_kmh;
use crate::{NavError, NavResult};

/// Name used when an edge has neither `name` nor `ref`.
pub const UNNAMED_ROAD: &str = "Unnamed Road";

/// The point range `[start, end]` of the polyline covered by one edge.
///
/// Consecutive spans share their boundary point: `spans[k].end ==
/// spans[k + 1].start`.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSpan {
    pub edge: EdgeId,
    pub start: usize,
    pub end: usize,
    pub name: String,
    pub speed_kmh: f64,
    /// Bearing of the edge's first segment, degrees clockwise from north.
    pub bearing_deg: f64,
}

#[derive(Clone, Debug, Default)]
pub struct Expansion {
    pub points: Vec<GeoPoint>,
    pub spans: Vec<EdgeSpan>,
}

fn display_name(attrs: &EdgeAttrs) -> String {
    let present = |s: &&str| !s.trim().is_empty();
    attrs
        .name
        .as_deref()
        .filter(present)
        .or_else(|| attrs.reference.as_deref().filter(present))
        .unwrap_or(UNNAMED_ROAD)
        .to_string()
}

/// Expand `nodes` over `graph`.
///
/// A single-node path yields one point and no spans.
pub fn expand(graph: &RoadGraph, nodes: &[NodeId], scenario: Scenario) -> NavResult<Expansion> {
    let first = *nodes.first().ok_or(NavError::EmptyPath)?;
    if let Some(&missing) = nodes.iter().find(|n| !graph.contains_node(**n)) {
        return Err(NavError::NodeNotFound(missing));
    }

    let mut out = Expansion {
        points: vec![graph.node_pos[first.index()]],
        spans: Vec::with_capacity(nodes.len().saturating_sub(1)),
    };

    for hop in nodes.windows(2) {
        let (a, b) = (hop[0], hop[1]);
        let edge = graph
            .shortest_edge_between(a, b)
            .ok_or(NavError::MissingEdge { from: a, to: b })?;
        let attrs = &graph.edge_attrs[edge.index()];

        let shape: Vec<GeoPoint> = if attrs.geometry.len() >= 2 {
            attrs.geometry.clone()
        } else {
            vec![graph.node_pos[a.index()], graph.node_pos[b.index()]]
        };

        let start = out.points.len() - 1;
        let skip = usize::from(out.points.last() == shape.first());
        out.points.extend_from_slice(&shape[skip..]);

        out.spans.push(EdgeSpan {
            edge,
            start,
            end: out.points.len() - 1,
            name: display_name(attrs),
            speed_kmh: edge_speed_kmh(attrs, scenario),
            bearing_deg: shape[0].bearing_deg(shape[1]),
        });
    }

    Ok(out)
}
