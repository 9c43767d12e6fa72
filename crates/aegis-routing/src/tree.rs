//! Precomputed single-destination shortest-path trees.
//!
//! Most calls in a dispatch region end at the same place (the regional
//! trauma centre).  For that landmark we run one Dijkstra on the *reversed*
//! corridor graph and keep, for every node, the next hop towards the
//! landmark.  Any later query to the landmark is answered by walking those
//! links: O(path length) instead of a fresh search.
//!
//! # Validity
//!
//! A tree is tied to the exact graph instance it was built from.  Graphs
//! derived by the closure filter carry no corridor key, so they can never
//! look a tree up; a reloaded corridor (after eviction) has a new instance
//! id, so a stale tree is rebuilt rather than reused.

use std::collections::BinaryHeap;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use aegis_core::{GeoPoint, NodeId};
use aegis_spatial::{CorridorKey, RoadGraph};

use crate::frontier::Frontier;
use crate::path::ShortestPath;
use crate::strategy::{check_endpoints, PathStrategy};
use crate::{RoutingError, RoutingResult};

// ── DestinationTree ───────────────────────────────────────────────────────────

/// Reverse shortest-path tree rooted at one landmark node.
pub struct DestinationTree {
    landmark: NodeId,
    /// `next_hop[v]` = neighbour of `v` on its shortest path to the landmark.
    next_hop: Vec<NodeId>,
    /// `dist_m[v]` = shortest distance from `v` to the landmark.
    dist_m: Vec<f64>,
    corridor: CorridorKey,
    graph_instance: u64,
}

impl DestinationTree {
    /// Build the tree for `landmark` over a corridor graph.
    ///
    /// # Errors
    ///
    /// [`RoutingError::TreeMiss`] if `graph` carries no corridor key (it was
    /// derived, e.g. closure-filtered).
    pub fn build(graph: &RoadGraph, landmark: NodeId) -> RoutingResult<Self> {
        let corridor = graph.corridor().ok_or_else(|| {
            RoutingError::TreeMiss("graph is not a cached corridor (closures applied?)".into())
        })?;
        if !graph.contains_node(landmark) {
            return Err(RoutingError::NodeNotFound(landmark));
        }

        let n = graph.node_count();
        let mut dist_m = vec![f64::INFINITY; n];
        let mut next_hop = vec![NodeId::INVALID; n];

        dist_m[landmark.index()] = 0.0;
        let mut heap = BinaryHeap::new();
        heap.push(Frontier { dist: 0.0, node: landmark });

        while let Some(Frontier { dist: d, node }) = heap.pop() {
            if d > dist_m[node.index()] {
                continue;
            }
            // Reversed graph: follow incoming edges backwards.
            for edge in graph.in_edges(node) {
                let prev = graph.edge_from[edge.index()];
                let nd = d + graph.edge_length_m[edge.index()];
                if nd < dist_m[prev.index()] {
                    dist_m[prev.index()] = nd;
                    next_hop[prev.index()] = node;
                    heap.push(Frontier { dist: nd, node: prev });
                }
            }
        }

        Ok(Self {
            landmark,
            next_hop,
            dist_m,
            corridor,
            graph_instance: graph.instance_id(),
        })
    }

    pub fn landmark(&self) -> NodeId {
        self.landmark
    }

    pub fn corridor(&self) -> CorridorKey {
        self.corridor
    }

    /// Shortest distance from `node` to the landmark, if reachable.
    pub fn distance_m(&self, node: NodeId) -> Option<f64> {
        self.dist_m
            .get(node.index())
            .copied()
            .filter(|d| d.is_finite())
    }

    /// Number of nodes (landmark included) that can reach the landmark.
    pub fn reachable_count(&self) -> usize {
        self.dist_m.iter().filter(|d| d.is_finite()).count()
    }

    /// `true` if this tree was built from exactly this graph instance.
    pub fn is_valid_for(&self, graph: &RoadGraph) -> bool {
        graph.corridor() == Some(self.corridor) && graph.instance_id() == self.graph_instance
    }

    /// Path from `source` to the landmark, in travel order.
    pub fn reconstruct(&self, source: NodeId) -> RoutingResult<Vec<NodeId>> {
        if self.distance_m(source).is_none() {
            return Err(RoutingError::TreeMiss(format!("{source} cannot reach the landmark")));
        }
        let mut nodes = vec![source];
        let mut cur = source;
        while cur != self.landmark {
            if nodes.len() > self.next_hop.len() {
                return Err(RoutingError::TreeMiss("next-hop chain contains a cycle".into()));
            }
            cur = self.next_hop[cur.index()];
            if !cur.is_valid() {
                return Err(RoutingError::TreeMiss(format!("broken next-hop chain from {source}")));
            }
            nodes.push(cur);
        }
        Ok(nodes)
    }
}

// ── Landmark & cache ──────────────────────────────────────────────────────────

/// The fixed destination a tree is kept for.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Landmark {
    pub point: GeoPoint,
    /// A requested destination within this distance counts as the landmark.
    pub tolerance_m: f64,
}

impl Landmark {
    pub fn new(point: GeoPoint, tolerance_m: f64) -> Self {
        Self { point, tolerance_m }
    }

    pub fn matches(&self, destination: GeoPoint) -> bool {
        self.point.distance_m(destination) <= self.tolerance_m
    }
}

/// One tree per observed corridor.  Unbounded: only a handful of distinct
/// corridors ever end at the landmark.
pub struct DestinationTreeCache {
    landmark: Landmark,
    trees:    RwLock<FxHashMap<CorridorKey, Arc<DestinationTree>>>,
}

impl DestinationTreeCache {
    pub fn new(landmark: Landmark) -> Self {
        Self { landmark, trees: RwLock::new(FxHashMap::default()) }
    }

    pub fn landmark(&self) -> Landmark {
        self.landmark
    }

    pub fn len(&self) -> usize {
        self.trees.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the tree for `graph`'s corridor, building it if absent or if
    /// the cached one belongs to a different graph instance.
    pub fn tree_for(&self, graph: &RoadGraph) -> RoutingResult<Arc<DestinationTree>> {
        let key = graph.corridor().ok_or_else(|| {
            RoutingError::TreeMiss("graph is not a cached corridor (closures applied?)".into())
        })?;

        if let Some(tree) = self.trees.read().get(&key) {
            if tree.is_valid_for(graph) {
                debug!(corridor = %key, "destination tree hit");
                return Ok(Arc::clone(tree));
            }
        }

        let landmark_node = graph
            .snap_to_node(self.landmark.point)
            .ok_or(RoutingError::EmptyCorridor)?;
        let tree = Arc::new(DestinationTree::build(graph, landmark_node)?);
        info!(
            corridor = %key,
            landmark = %landmark_node,
            reachable = tree.reachable_count(),
            "built destination tree"
        );

        self.trees.write().insert(key, Arc::clone(&tree));
        Ok(tree)
    }
}

// ── PrecomputedStrategy ───────────────────────────────────────────────────────

/// Answers queries ending at the landmark node from the cached tree.
pub struct PrecomputedStrategy {
    cache: Arc<DestinationTreeCache>,
}

impl PrecomputedStrategy {
    pub fn new(cache: Arc<DestinationTreeCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<DestinationTreeCache> {
        &self.cache
    }
}

impl PathStrategy for PrecomputedStrategy {
    fn label(&self) -> &'static str {
        "precomputed"
    }

    fn solve(&self, graph: &RoadGraph, source: NodeId, destination: NodeId) -> RoutingResult<ShortestPath> {
        check_endpoints(graph, source, destination)?;
        let tree = self.cache.tree_for(graph)?;
        if tree.landmark() != destination {
            return Err(RoutingError::TreeMiss(format!(
                "destination {destination} is not the landmark node {}",
                tree.landmark()
            )));
        }
        Ok(ShortestPath::new(tree.reconstruct(source)?))
    }
}
