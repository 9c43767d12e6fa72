//! Fluent builder for a [`RouteService`].

use std::sync::Arc;

use tracing::info;

use aegis_routing::{DestinationTreeCache, ExperimentalStrategy, Landmark, PathSolver, PathStrategy};
use aegis_spatial::{ClosureFilter, CorridorCache, GraphProvider};

use crate::{DispatchConfig, DispatchResult, RouteService};

/// Fluent builder for [`RouteService<P>`].
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                                          |
/// |------------------------|--------------------------------------------------|
/// | `.config(c)`           | `DispatchConfig::default()`                      |
/// | `.experimental(s)`     | Process backend from `config.solver`, if any     |
///
/// # Example
///
/// ```rust,ignore
/// let config = DispatchConfig::load("aegis.json")?;
/// let service = RouteServiceBuilder::new(ClippingProvider::new(region))
///     .config(config)
///     .build()?;
/// let response = service.route(&RouteRequest::new(start, end))?;
/// ```
pub struct RouteServiceBuilder<P: GraphProvider> {
    provider:     P,
    config:       DispatchConfig,
    experimental: Option<Box<dyn PathStrategy>>,
}

impl<P: GraphProvider> RouteServiceBuilder<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: DispatchConfig::default(),
            experimental: None,
        }
    }

    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `strategy` as the experimental strategy instead of the process
    /// backend described by `config.solver`.
    pub fn experimental(mut self, strategy: impl PathStrategy + 'static) -> Self {
        self.experimental = Some(Box::new(strategy));
        self
    }

    /// Validate the configuration and assemble the service.
    pub fn build(self) -> DispatchResult<RouteService<P>> {
        self.config.validate()?;

        let mut solver = PathSolver::new();

        // ── Experimental strategy ─────────────────────────────────────────
        match (self.experimental, self.config.solver.backend()) {
            (Some(strategy), _) => solver = solver.with_experimental(strategy),
            (None, Some(backend)) => {
                info!(program = %backend.program().display(), "external solver configured");
                solver = solver.with_experimental(ExperimentalStrategy::new(backend));
            }
            (None, None) => {}
        }

        // ── Landmark tree ─────────────────────────────────────────────────
        if let Some(l) = &self.config.landmark {
            let landmark = Landmark::new(l.point(), l.tolerance_m);
            info!(landmark = %landmark.point, tolerance_m = l.tolerance_m, "precomputed landmark configured");
            solver = solver.with_precomputed(Arc::new(DestinationTreeCache::new(landmark)));
        }

        Ok(RouteService {
            corridors:   CorridorCache::with_capacity(self.provider, self.config.corridor.capacity),
            closures:    ClosureFilter::new(self.config.closures.radius_m),
            solver,
            padding_deg: self.config.corridor.padding_deg,
        })
    }
}
