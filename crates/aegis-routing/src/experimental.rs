//! Experimental strategy: delegate the search to an opaque backend.
//!
//! The backend receives the corridor as a dense index table (node `i` is
//! `NodeId(i)`), a directed weighted edge list, and the source/destination
//! indices.  It answers with a predecessor array where `-1` means "none".
//! Nothing is assumed about how the backend computes it; every answer is
//! validated before use and any defect is reported as
//! [`RoutingError::Solver`] so the dispatcher can fall back.

use serde::Serialize;

use aegis_core::NodeId;
use aegis_spatial::RoadGraph;

use crate::path::ShortestPath;
use crate::strategy::{check_endpoints, PathStrategy};
use crate::{RoutingError, RoutingResult};

// ── Wire input ────────────────────────────────────────────────────────────────

/// Serialized corridor handed to a [`SolverBackend`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SolverInput {
    pub node_count: usize,
    /// `(from_index, to_index, weight_m)` for every directed edge.
    pub edges: Vec<(usize, usize, f64)>,
    pub source: usize,
    pub destination: usize,
}

impl SolverInput {
    pub fn from_graph(graph: &RoadGraph, source: NodeId, destination: NodeId) -> Self {
        let edges = (0..graph.edge_count())
            .map(|i| (graph.edge_from[i].index(), graph.edge_to[i].index(), graph.edge_length_m[i]))
            .collect();
        Self {
            node_count: graph.node_count(),
            edges,
            source: source.index(),
            destination: destination.index(),
        }
    }
}

// ── Backend trait ─────────────────────────────────────────────────────────────

/// Something that turns a [`SolverInput`] into a predecessor array.
pub trait SolverBackend: Send + Sync {
    fn predecessors(&self, input: &SolverInput) -> RoutingResult<Vec<i64>>;
}

impl<F> SolverBackend for F
where
    F: Fn(&SolverInput) -> RoutingResult<Vec<i64>> + Send + Sync,
{
    fn predecessors(&self, input: &SolverInput) -> RoutingResult<Vec<i64>> {
        self(input)
    }
}

// ── Strategy ──────────────────────────────────────────────────────────────────

pub struct ExperimentalStrategy<B: SolverBackend> {
    backend: B,
}

impl<B: SolverBackend> ExperimentalStrategy<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: SolverBackend> PathStrategy for ExperimentalStrategy<B> {
    fn label(&self) -> &'static str {
        "experimental"
    }

    fn solve(&self, graph: &RoadGraph, source: NodeId, destination: NodeId) -> RoutingResult<ShortestPath> {
        check_endpoints(graph, source, destination)?;
        let input = SolverInput::from_graph(graph, source, destination);
        let pred = self.backend.predecessors(&input)?;
        let nodes = walk_predecessors(&pred, graph.node_count(), source, destination)?;

        if let Some(w) = nodes.windows(2).find(|w| graph.edges_between(w[0], w[1]).next().is_none()) {
            return Err(RoutingError::Solver(format!(
                "predecessor chain uses missing edge {} -> {}",
                w[0], w[1]
            )));
        }
        Ok(ShortestPath::new(nodes))
    }
}

/// Walk `pred` from `destination` back to `source` and return the path in
/// source → destination order.
///
/// Rejects arrays of the wrong length, out-of-range entries, an unreachable
/// destination, and chains longer than `node_count` (a cycle).
pub fn walk_predecessors(
    pred: &[i64],
    node_count: usize,
    source: NodeId,
    destination: NodeId,
) -> RoutingResult<Vec<NodeId>> {
    if pred.len() != node_count {
        return Err(RoutingError::Solver(format!(
            "predecessor array has {} entries, expected {node_count}",
            pred.len()
        )));
    }

    let mut nodes = vec![destination];
    let mut cur = destination;
    while cur != source {
        if nodes.len() > node_count {
            return Err(RoutingError::Solver("predecessor chain contains a cycle".into()));
        }
        let p = pred[cur.index()];
        if p < 0 {
            return Err(RoutingError::Solver(format!("{destination} unreachable from {source}")));
        }
        let p = usize::try_from(p)
            .ok()
            .filter(|&p| p < node_count)
            .ok_or_else(|| RoutingError::Solver(format!("predecessor {p} out of range")))?;
        cur = NodeId(p as u32);
        nodes.push(cur);
    }
    nodes.reverse();
    Ok(nodes)
}
