//! Road graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! A second CSR (`node_in_start` / `in_edges`) indexes incoming edges so the
//! destination tree can search the reversed graph without materialising it.
//!
//! Edges are directed; one-way roads are simply edges without a twin.  The
//! graph is a multigraph: parallel edges between the same node pair are kept
//! and disambiguated by length at expansion time.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`.  Used
//! to snap request endpoints onto the corridor.
//!
//! # Identity
//!
//! Every built graph gets a process-unique `instance_id`.  Graphs handed out
//! by the corridor cache also carry their [`CorridorKey`]; derived graphs
//! (closure-filtered copies) carry none.

use std::sync::atomic::{AtomicU64, Ordering};

use petgraph::graph::{DiGraph, NodeIndex};
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use aegis_core::{EdgeId, GeoPoint, NodeId};

use crate::corridor::CorridorKey;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Sufficient for
    /// nearest-node queries within a corridor.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── Edge attributes ───────────────────────────────────────────────────────────

/// Descriptive attributes of a directed edge, as delivered by the map-data
/// provider.  None of these influence path weight (that is `length_m`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeAttrs {
    /// Street name (`name=*`).
    pub name: Option<String>,
    /// Route reference (`ref=*`), e.g. `"HWY 7"`.
    pub reference: Option<String>,
    /// Road class (`highway=*`), e.g. `"primary"`.
    pub highway: Option<String>,
    /// Raw speed tag (`maxspeed=*`), e.g. `"50"` or `"30 mph"`.
    pub maxspeed: Option<String>,
    /// Ordered shape points from the edge's source to its target.  Empty
    /// means "straight line between the end nodes".
    pub geometry: Vec<GeoPoint>,
}

impl EdgeAttrs {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_ref(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_highway(mut self, highway: impl Into<String>) -> Self {
        self.highway = Some(highway.into());
        self
    }

    pub fn with_maxspeed(mut self, maxspeed: impl Into<String>) -> Self {
        self.maxspeed = Some(maxspeed.into());
        self
    }

    pub fn with_geometry(mut self, geometry: Vec<GeoPoint>) -> Self {
        self.geometry = geometry;
        self
    }

    /// Same attributes with the geometry reversed, for the opposite direction
    /// of a two-way road.
    fn reversed(&self) -> Self {
        let mut r = self.clone();
        r.geometry.reverse();
        r
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Directed road multigraph in CSR format plus a spatial index for snapping.
///
/// Immutable once built.  Do not construct directly; use
/// [`RoadGraphBuilder`].
pub struct RoadGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// Outgoing edges of node `n` are EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Incoming edges of node `n` are `in_edges[node_in_start[n] .. node_in_start[n+1]]`.
    pub node_in_start: Vec<u32>,
    pub in_edges: Vec<EdgeId>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,
    /// Length of each edge in metres.  This is the routing weight.
    pub edge_length_m: Vec<f64>,
    pub edge_attrs: Vec<EdgeAttrs>,

    // ── Derived views ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
    /// Same topology as a petgraph `DiGraph`; node index `i` is `NodeId(i)`
    /// and each edge weight is its `EdgeId`.
    topology: DiGraph<(), EdgeId>,

    // ── Identity ──────────────────────────────────────────────────────────
    instance_id: u64,
    corridor: Option<CorridorKey>,
}

impl RoadGraph {
    /// Construct an empty graph with no nodes or edges.
    pub fn empty() -> Self {
        RoadGraphBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Identity ──────────────────────────────────────────────────────────

    /// Process-unique id of this graph instance.
    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    /// Corridor this graph was loaded for, or `None` for derived graphs.
    pub fn corridor(&self) -> Option<CorridorKey> {
        self.corridor
    }

    /// Tag the graph with the corridor it was loaded for.
    pub fn with_corridor(mut self, key: CorridorKey) -> Self {
        self.corridor = Some(key);
        self
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Iterator over the `EdgeId`s of all incoming edges to `node`.
    #[inline]
    pub fn in_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_in_start[node.index()] as usize;
        let end   = self.node_in_start[node.index() + 1] as usize;
        self.in_edges[start..end].iter().copied()
    }

    /// Out-degree of `node` (number of outgoing edges).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// All parallel edges from `a` to `b`.
    pub fn edges_between(&self, a: NodeId, b: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges(a).filter(move |e| self.edge_to[e.index()] == b)
    }

    /// The shortest of the parallel edges from `a` to `b`; the first one wins
    /// a tie.
    pub fn shortest_edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.edges_between(a, b).fold(None, |best: Option<EdgeId>, e| match best {
            Some(b) if self.edge_length_m[b.index()] <= self.edge_length_m[e.index()] => Some(b),
            _ => Some(e),
        })
    }

    /// Total length of a node path, taking the shortest parallel edge for
    /// each hop.  `None` if some consecutive pair is not connected.
    pub fn path_length_m(&self, nodes: &[NodeId]) -> Option<f64> {
        nodes.windows(2).try_fold(0.0, |acc, w| {
            self.shortest_edge_between(w[0], w[1])
                .map(|e| acc + self.edge_length_m[e.index()])
        })
    }

    /// Petgraph view of the topology, for library graph algorithms.
    pub fn topology(&self) -> &DiGraph<(), EdgeId> {
        &self.topology
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest road node to `pos`.
    ///
    /// Returns `None` only if the graph has no nodes.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    /// Return up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .take(k)
            .map(|e| e.id)
            .collect()
    }

    // ── Derivation ────────────────────────────────────────────────────────

    /// Build a new graph keeping every node (same `NodeId`s) and only the
    /// edges for which `keep` returns `true`.
    ///
    /// The result is a fresh instance with no corridor tag; `self` is left
    /// untouched.
    pub fn retain_edges(&self, mut keep: impl FnMut(EdgeId) -> bool) -> RoadGraph {
        let mut b = RoadGraphBuilder::with_capacity(self.node_count(), self.edge_count());
        for &pos in &self.node_pos {
            b.add_node(pos);
        }
        for i in 0..self.edge_count() {
            if keep(EdgeId(i as u32)) {
                b.add_directed_edge(
                    self.edge_from[i],
                    self.edge_to[i],
                    self.edge_length_m[i],
                    self.edge_attrs[i].clone(),
                );
            }
        }
        b.build()
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use aegis_core::GeoPoint;
/// use aegis_spatial::{EdgeAttrs, RoadGraphBuilder};
///
/// let mut b = RoadGraphBuilder::new();
/// let a = b.add_node(GeoPoint::new(43.856, -79.337));
/// let c = b.add_node(GeoPoint::new(43.858, -79.340));
/// b.add_road(a, c, 310.0, EdgeAttrs::default().with_name("Main Street"));
/// let g = b.build();
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.edge_count(), 2); // bidirectional
/// ```
pub struct RoadGraphBuilder {
    nodes:     Vec<GeoPoint>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    length_m: f64,
    attrs:    EdgeAttrs,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new() }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a road node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge from `from` to `to`.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64, attrs: EdgeAttrs) {
        self.raw_edges.push(RawEdge { from, to, length_m, attrs });
    }

    /// Add edges in **both directions** for a two-way road segment.  The
    /// reverse edge gets the reversed geometry.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64, attrs: EdgeAttrs) {
        let back = attrs.reversed();
        self.add_directed_edge(a, b, length_m, attrs);
        self.add_directed_edge(b, a, length_m, back);
    }

    /// Like [`add_road`](Self::add_road) with the length measured as the
    /// haversine distance between the two nodes.
    pub fn add_straight_road(&mut self, a: NodeId, b: NodeId, attrs: EdgeAttrs) {
        let len = self.node_pos(a).distance_m(self.node_pos(b));
        self.add_road(a, b, len, attrs);
    }

    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadGraph`].
    ///
    /// Edges are sorted by source node with a stable sort, so parallel edges
    /// keep their insertion order.
    pub fn build(self) -> RoadGraph {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let mut edge_from     = Vec::with_capacity(edge_count);
        let mut edge_to       = Vec::with_capacity(edge_count);
        let mut edge_length_m = Vec::with_capacity(edge_count);
        let mut edge_attrs    = Vec::with_capacity(edge_count);
        for e in raw {
            edge_from.push(e.from);
            edge_to.push(e.to);
            edge_length_m.push(e.length_m);
            edge_attrs.push(e.attrs);
        }

        // Outgoing CSR row pointer.
        let mut node_out_start = vec![0u32; node_count + 1];
        for from in &edge_from {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // Incoming CSR: counting sort of edge ids by target node.
        let mut node_in_start = vec![0u32; node_count + 1];
        for to in &edge_to {
            node_in_start[to.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_in_start[i] += node_in_start[i - 1];
        }
        let mut cursor: Vec<u32> = node_in_start[..node_count].to_vec();
        let mut in_edges = vec![EdgeId::INVALID; edge_count];
        for (i, to) in edge_to.iter().enumerate() {
            let slot = &mut cursor[to.index()];
            in_edges[*slot as usize] = EdgeId(i as u32);
            *slot += 1;
        }

        let mut topology = DiGraph::with_capacity(node_count, edge_count);
        for _ in 0..node_count {
            topology.add_node(());
        }
        for i in 0..edge_count {
            topology.add_edge(
                NodeIndex::new(edge_from[i].index()),
                NodeIndex::new(edge_to[i].index()),
                EdgeId(i as u32),
            );
        }

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.lat, pos.lon],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadGraph {
            node_pos: self.nodes,
            node_out_start,
            node_in_start,
            in_edges,
            edge_from,
            edge_to,
            edge_length_m,
            edge_attrs,
            spatial_idx,
            topology,
            instance_id: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            corridor: None,
        }
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
