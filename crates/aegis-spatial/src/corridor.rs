//! Corridor keys and the memoized corridor-graph cache.
//!
//! A corridor is the padded bounding rectangle around a trip's endpoints.
//! Its bounds are rounded to 3 decimal degrees (~110 m) before lookup, so
//! requests whose endpoints move by a few metres hit the same cached graph.
//!
//! # Concurrency
//!
//! The cache lock is held only for map lookups and inserts, never across a
//! provider load.  Two requests missing on the same key may both load; the
//! second insert overwrites the first.  Loads are deterministic, so this is
//! harmless.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use aegis_core::{BoundingBox, GeoPoint};

use crate::network::RoadGraph;
use crate::SpatialResult;

/// Default number of corridor graphs retained.
pub const DEFAULT_CORRIDOR_CAPACITY: usize = 16;

// ── CorridorKey ───────────────────────────────────────────────────────────────

/// Corridor bounds in thousandths of a degree.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorridorKey {
    min_lat_e3: i32,
    min_lon_e3: i32,
    max_lat_e3: i32,
    max_lon_e3: i32,
}

impl CorridorKey {
    pub fn from_bbox(bbox: &BoundingBox) -> Self {
        let r = |v: f64| (v * 1_000.0).round() as i32;
        Self {
            min_lat_e3: r(bbox.min_lat),
            min_lon_e3: r(bbox.min_lon),
            max_lat_e3: r(bbox.max_lat),
            max_lon_e3: r(bbox.max_lon),
        }
    }

    /// Key for the trip `start → end` with `padding_deg` on every side.
    pub fn for_trip(start: GeoPoint, end: GeoPoint, padding_deg: f64) -> Self {
        Self::from_bbox(&BoundingBox::around(start, end, padding_deg))
    }

    /// The rounded rectangle this key stands for.
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(
            self.min_lat_e3 as f64 / 1_000.0,
            self.min_lon_e3 as f64 / 1_000.0,
            self.max_lat_e3 as f64 / 1_000.0,
            self.max_lon_e3 as f64 / 1_000.0,
        )
    }
}

impl std::fmt::Display for CorridorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let b = self.bbox();
        write!(f, "{:.3},{:.3},{:.3},{:.3}", b.min_lat, b.min_lon, b.max_lat, b.max_lon)
    }
}

// ── GraphProvider ─────────────────────────────────────────────────────────────

/// Source of road graphs for a rectangle (map-data extract, tile store, …).
///
/// Implementations must be deterministic for a given rectangle; the cache
/// relies on that to tolerate racing loads.
pub trait GraphProvider: Send + Sync {
    fn load(&self, bbox: &BoundingBox) -> SpatialResult<RoadGraph>;
}

impl<P: GraphProvider + ?Sized> GraphProvider for Arc<P> {
    fn load(&self, bbox: &BoundingBox) -> SpatialResult<RoadGraph> {
        (**self).load(bbox)
    }
}

// ── Corridor ──────────────────────────────────────────────────────────────────

/// A cached corridor graph together with its key.
#[derive(Clone)]
pub struct Corridor {
    pub key: CorridorKey,
    pub graph: Arc<RoadGraph>,
}

// ── CorridorCache ─────────────────────────────────────────────────────────────

/// Bounded LRU cache of corridor graphs in front of a [`GraphProvider`].
pub struct CorridorCache<P: GraphProvider> {
    provider: P,
    capacity: usize,
    state:    Mutex<LruState>,
}

#[derive(Default)]
struct LruState {
    entries: FxHashMap<CorridorKey, Slot>,
    /// Monotonic use counter; the slot with the smallest stamp is evicted.
    clock: u64,
}

struct Slot {
    graph:     Arc<RoadGraph>,
    last_used: u64,
}

impl<P: GraphProvider> CorridorCache<P> {
    pub fn new(provider: P) -> Self {
        Self::with_capacity(provider, DEFAULT_CORRIDOR_CAPACITY)
    }

    /// `capacity` is clamped to at least 1.
    pub fn with_capacity(provider: P, capacity: usize) -> Self {
        Self {
            provider,
            capacity: capacity.max(1),
            state: Mutex::new(LruState::default()),
        }
    }

    /// Return the graph for the padded corridor around `start`/`end`,
    /// loading it from the provider on a miss.
    pub fn get(&self, start: GeoPoint, end: GeoPoint, padding_deg: f64) -> SpatialResult<Corridor> {
        let key = CorridorKey::for_trip(start, end, padding_deg);
        self.get_by_key(key)
    }

    pub fn get_by_key(&self, key: CorridorKey) -> SpatialResult<Corridor> {
        {
            let mut state = self.state.lock();
            state.clock += 1;
            let now = state.clock;
            if let Some(slot) = state.entries.get_mut(&key) {
                slot.last_used = now;
                debug!(corridor = %key, "corridor cache hit");
                return Ok(Corridor { key, graph: Arc::clone(&slot.graph) });
            }
        }

        let bbox = key.bbox();
        info!(corridor = %key, "loading corridor graph");
        let graph = Arc::new(self.provider.load(&bbox)?.with_corridor(key));
        info!(
            corridor = %key,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "corridor graph loaded"
        );

        let mut state = self.state.lock();
        state.clock += 1;
        let now = state.clock;
        if !state.entries.contains_key(&key) && state.entries.len() >= self.capacity {
            let victim = state
                .entries
                .iter()
                .min_by_key(|(_, s)| s.last_used)
                .map(|(k, _)| *k);
            if let Some(victim) = victim {
                state.entries.remove(&victim);
                debug!(corridor = %victim, "evicted least recently used corridor");
            }
        }
        state.entries.insert(key, Slot { graph: Arc::clone(&graph), last_used: now });

        Ok(Corridor { key, graph })
    }

    pub fn contains(&self, key: &CorridorKey) -> bool {
        self.state.lock().entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }
}
