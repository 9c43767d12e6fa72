//! Strategy trait and the two in-process Dijkstra variants.
//!
//! # Pluggability
//!
//! [`PathSolver`](crate::PathSolver) calls strategies through [`PathStrategy`],
//! so the experimental implementation (foreign process, dynamic library,
//! native port) can be swapped without touching callers.

use std::collections::BinaryHeap;

use petgraph::algo::astar;
use petgraph::graph::NodeIndex;

use aegis_core::{EdgeId, NodeId};
use aegis_spatial::RoadGraph;

use crate::frontier::Frontier;
use crate::path::{ShortestPath, TraceSegment};
use crate::{RoutingError, RoutingResult};

// ── PathStrategy trait ────────────────────────────────────────────────────────

/// A shortest-path algorithm over a corridor graph.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`; one solver instance serves every
/// concurrent request.
pub trait PathStrategy: Send + Sync {
    /// Short label reported when this strategy produced the path.
    fn label(&self) -> &'static str;

    /// Compute a path from `source` to `destination`, both inclusive.
    ///
    /// `source == destination` yields a single-node path.
    fn solve(
        &self,
        graph: &RoadGraph,
        source: NodeId,
        destination: NodeId,
    ) -> RoutingResult<ShortestPath>;
}

impl<S: PathStrategy + ?Sized> PathStrategy for Box<S> {
    fn label(&self) -> &'static str {
        (**self).label()
    }

    fn solve(&self, graph: &RoadGraph, source: NodeId, destination: NodeId) -> RoutingResult<ShortestPath> {
        (**self).solve(graph, source, destination)
    }
}

/// Reject empty graphs and out-of-range endpoints before any search.
pub(crate) fn check_endpoints(graph: &RoadGraph, source: NodeId, destination: NodeId) -> RoutingResult<()> {
    if graph.is_empty() {
        return Err(RoutingError::EmptyCorridor);
    }
    for n in [source, destination] {
        if !graph.contains_node(n) {
            return Err(RoutingError::NodeNotFound(n));
        }
    }
    Ok(())
}

// ── BaselineStrategy ──────────────────────────────────────────────────────────

/// Deterministic shortest path by edge length, delegated to petgraph's A*
/// with a zero heuristic (plain Dijkstra that also returns the path).
#[derive(Copy, Clone, Debug, Default)]
pub struct BaselineStrategy;

impl PathStrategy for BaselineStrategy {
    fn label(&self) -> &'static str {
        "baseline"
    }

    fn solve(&self, graph: &RoadGraph, source: NodeId, destination: NodeId) -> RoutingResult<ShortestPath> {
        check_endpoints(graph, source, destination)?;

        let goal = NodeIndex::new(destination.index());
        let (_, nodes) = astar(
            graph.topology(),
            NodeIndex::new(source.index()),
            |n| n == goal,
            |e| graph.edge_length_m[e.weight().index()],
            |_| 0.0,
        )
        .ok_or(RoutingError::NoPath { from: source, to: destination })?;

        Ok(ShortestPath::new(
            nodes.into_iter().map(|n| NodeId(n.index() as u32)).collect(),
        ))
    }
}

// ── TracedStrategy ────────────────────────────────────────────────────────────

/// Explicit priority-queue Dijkstra that records every edge it examines, in
/// visitation order, for visualising the search frontier.
///
/// Produces paths of the same total length as [`BaselineStrategy`]; on ties
/// the node sequence may differ.
#[derive(Copy, Clone, Debug, Default)]
pub struct TracedStrategy;

impl PathStrategy for TracedStrategy {
    fn label(&self) -> &'static str {
        "baseline-traced"
    }

    fn solve(&self, graph: &RoadGraph, source: NodeId, destination: NodeId) -> RoutingResult<ShortestPath> {
        check_endpoints(graph, source, destination)?;

        let n = graph.node_count();
        // dist[v] = best known length (m) to reach v.
        let mut dist = vec![f64::INFINITY; n];
        // prev_edge[v] = edge that reached v; INVALID for unreached nodes.
        let mut prev_edge = vec![EdgeId::INVALID; n];
        let mut trace = Vec::new();

        dist[source.index()] = 0.0;
        let mut heap = BinaryHeap::new();
        heap.push(Frontier { dist: 0.0, node: source });

        while let Some(Frontier { dist: d, node }) = heap.pop() {
            if node == destination {
                let nodes = reconstruct(graph, &prev_edge, source, destination);
                return Ok(ShortestPath::new(nodes).with_trace(trace));
            }

            // Skip stale heap entries.
            if d > dist[node.index()] {
                continue;
            }

            for edge in graph.out_edges(node) {
                let next = graph.edge_to[edge.index()];
                trace.push(TraceSegment { from: node, to: next });

                let nd = d + graph.edge_length_m[edge.index()];
                if nd < dist[next.index()] {
                    dist[next.index()] = nd;
                    prev_edge[next.index()] = edge;
                    heap.push(Frontier { dist: nd, node: next });
                }
            }
        }

        Err(RoutingError::NoPath { from: source, to: destination })
    }
}

fn reconstruct(graph: &RoadGraph, prev_edge: &[EdgeId], source: NodeId, destination: NodeId) -> Vec<NodeId> {
    let mut nodes = vec![destination];
    let mut cur = destination;
    while cur != source {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        cur = graph.edge_from[e.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    nodes
}
