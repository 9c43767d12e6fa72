//! Strategy output types.

use aegis_core::NodeId;

/// One examined edge of an exploration trace.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TraceSegment {
    pub from: NodeId,
    pub to: NodeId,
}

/// Node sequence from source to destination, both inclusive.
#[derive(Clone, Debug, PartialEq)]
pub struct ShortestPath {
    pub nodes: Vec<NodeId>,
    /// Edges in the order the search examined them; only the traced
    /// strategy fills this in.
    pub trace: Option<Vec<TraceSegment>>,
}

impl ShortestPath {
    pub fn new(nodes: Vec<NodeId>) -> Self {
        Self { nodes, trace: None }
    }

    pub fn with_trace(mut self, trace: Vec<TraceSegment>) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn source(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// `true` if source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }
}
