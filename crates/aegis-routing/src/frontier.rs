//! Min-heap entry shared by the hand-written searches.

use std::cmp::Ordering;

use aegis_core::NodeId;

/// `BinaryHeap` is a max-heap; this ordering is reversed on distance so the
/// closest node pops first.  Ties break on the smaller `NodeId` for
/// deterministic output.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Frontier {
    pub dist: f64,
    pub node: NodeId,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
