//! The request pipeline.
//!
//! ```text
//! RouteRequest
//!   ├─ CorridorCache::get          padded, rounded rectangle → shared graph
//!   ├─ ClosureFilter::apply        only if closures were sent; derived copy
//!   ├─ snap start/end              nearest node (R-tree)
//!   ├─ PathSolver::select/resolve  strategy, fallback to baseline
//!   └─ NarrativeBuilder::build     polyline, timeline, steps, pivots
//! ```
//!
//! Nothing here holds a lock while searching; the caches lock only to look
//! up or insert.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use aegis_core::{GeoPoint, Scenario};
use aegis_lookup::{AddressCandidate, AddressProvider, LookupThrottle};
use aegis_nav::NarrativeBuilder;
use aegis_routing::{PathSolver, StrategyKind};
use aegis_spatial::{ClosureFilter, CorridorCache, GraphProvider, RoadGraph};

use crate::{DispatchResult, NavigationFault, RouteRequest, RouteResponse};

/// Computes routes over corridors loaded from `P`.
pub struct RouteService<P: GraphProvider> {
    pub(crate) corridors:   CorridorCache<P>,
    pub(crate) closures:    ClosureFilter,
    pub(crate) solver:      PathSolver,
    pub(crate) padding_deg: f64,
}

fn checked(label: &str, p: GeoPoint) -> Result<GeoPoint, NavigationFault> {
    GeoPoint::checked(p.lat, p.lon)
        .map_err(|e| NavigationFault::InvalidRequest(format!("{label}: {e}")))
}

impl<P: GraphProvider> RouteService<P> {
    pub fn corridors(&self) -> &CorridorCache<P> {
        &self.corridors
    }

    pub fn solver(&self) -> &PathSolver {
        &self.solver
    }

    pub fn closure_filter(&self) -> &ClosureFilter {
        &self.closures
    }

    pub fn padding_deg(&self) -> f64 {
        self.padding_deg
    }

    /// Strategy the request asked for.  A trace request turns baseline into
    /// traced; an unknown name is logged and treated as baseline.
    fn requested_strategy(req: &RouteRequest) -> StrategyKind {
        let kind = StrategyKind::from_str(&req.strategy).unwrap_or_else(|e| {
            warn!(error = %e, "unknown strategy requested, using baseline");
            StrategyKind::Baseline
        });
        match kind {
            StrategyKind::Baseline if req.trace => StrategyKind::Traced,
            other => other,
        }
    }

    /// Run the full pipeline for one request.  Blocking: the experimental
    /// strategy may wait on an external process.
    pub fn route(&self, req: &RouteRequest) -> DispatchResult<RouteResponse> {
        let started = Instant::now();
        let start = checked("start", req.start)?;
        let end = checked("end", req.end)?;
        for (i, c) in req.closures.iter().enumerate() {
            checked(&format!("closure {i}"), *c)?;
        }

        let scenario = Scenario::classify(&req.scenario);
        let requested = Self::requested_strategy(req);

        let corridor = self.corridors.get(start, end, self.padding_deg)?;
        let filtered;
        let graph: &RoadGraph = if req.closures.is_empty() {
            corridor.graph.as_ref()
        } else {
            filtered = self.closures.apply(&corridor.graph, &req.closures);
            &filtered
        };

        let snap = |label: &str, p: GeoPoint| {
            graph
                .snap_to_node(p)
                .ok_or_else(|| NavigationFault::EndpointSnapFailure(format!("{label} {p}")))
        };
        let source = snap("start", start)?;
        let mut destination = snap("end", end)?;

        let kind = self.solver.select(requested, end, !req.closures.is_empty());
        if kind == StrategyKind::Precomputed && req.closures.is_empty() {
            if let Some(landmark) = self.solver.landmark_node(graph, end) {
                destination = landmark;
            }
        }
        let resolution = self.solver.resolve(graph, source, destination, kind)?;

        let package = NarrativeBuilder::new(scenario).build(
            graph,
            &resolution.path.nodes,
            resolution.algorithm.as_str(),
        )?;

        let trace = match (&resolution.path.trace, req.trace) {
            (Some(segments), true) => Some(
                segments
                    .iter()
                    .map(|s| [graph.node_pos[s.from.index()], graph.node_pos[s.to.index()]])
                    .collect(),
            ),
            _ => None,
        };

        info!(
            corridor = %corridor.key,
            scenario = scenario.as_str(),
            requested = requested.as_str(),
            algorithm = resolution.algorithm.as_str(),
            closures = req.closures.len(),
            distance_m = package.total_distance_m().round() as u64,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "route computed"
        );

        Ok(RouteResponse::assemble(
            package,
            corridor.key.to_string(),
            (graph.node_pos[source.index()], graph.node_pos[destination.index()]),
            trace,
        ))
    }

    /// [`route`](Self::route) on tokio's blocking pool, so a slow external
    /// solver never stalls the runtime's worker threads.
    pub async fn route_async(self: Arc<Self>, req: RouteRequest) -> DispatchResult<RouteResponse>
    where
        P: 'static,
    {
        tokio::task::spawn_blocking(move || self.route(&req))
            .await
            .map_err(|e| NavigationFault::GraphUnavailable(format!("routing task failed: {e}")))?
    }
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

/// Front door: routes plus the throttled address lookups.
pub struct Dispatcher<P: GraphProvider, A> {
    routes: Arc<RouteService<P>>,
    lookup: LookupThrottle<A>,
}

impl<P, A> Dispatcher<P, A>
where
    P: GraphProvider + 'static,
    A: AddressProvider,
{
    pub fn new(routes: RouteService<P>, lookup: LookupThrottle<A>) -> Self {
        Self { routes: Arc::new(routes), lookup }
    }

    pub fn routes(&self) -> &Arc<RouteService<P>> {
        &self.routes
    }

    pub fn lookup(&self) -> &LookupThrottle<A> {
        &self.lookup
    }

    pub async fn route(&self, req: RouteRequest) -> DispatchResult<RouteResponse> {
        Arc::clone(&self.routes).route_async(req).await
    }

    pub async fn geocode(&self, query: &str) -> DispatchResult<Option<AddressCandidate>> {
        Ok(self.lookup.geocode(query).await?)
    }

    pub async fn autocomplete(&self, query: &str) -> DispatchResult<Vec<AddressCandidate>> {
        Ok(self.lookup.autocomplete(query).await?)
    }
}
