//! Strategy dispatcher with transparent fallback.
//!
//! ```text
//! requested strategy ─► select() ─► resolve()
//!                                      │ experimental / precomputed failed?
//!                                      └──► baseline, labelled as fallback
//! ```
//!
//! Strategy failures never reach the caller; they only change the
//! [`Algorithm`] reported with the path.  Failures that leave no usable path
//! at all (empty corridor, disconnected endpoints) are returned as errors.

use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, warn};

use aegis_core::{GeoPoint, NodeId};
use aegis_spatial::RoadGraph;

use crate::path::ShortestPath;
use crate::strategy::{BaselineStrategy, PathStrategy, TracedStrategy};
use crate::tree::{DestinationTreeCache, PrecomputedStrategy};
use crate::{RoutingError, RoutingResult};

// ── StrategyKind ──────────────────────────────────────────────────────────────

/// Strategy a caller can ask for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum StrategyKind {
    #[default]
    Baseline,
    Traced,
    Experimental,
    Precomputed,
}

impl StrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Baseline     => "baseline",
            StrategyKind::Traced       => "traced",
            StrategyKind::Experimental => "experimental",
            StrategyKind::Precomputed  => "precomputed",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "baseline" | "dijkstra" => Ok(StrategyKind::Baseline),
            "traced" | "baseline-traced" => Ok(StrategyKind::Traced),
            "experimental"               => Ok(StrategyKind::Experimental),
            "precomputed"                => Ok(StrategyKind::Precomputed),
            other => Err(format!("unknown strategy {other:?}")),
        }
    }
}

// ── Algorithm ─────────────────────────────────────────────────────────────────

/// Which algorithm actually produced a path.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Algorithm {
    Baseline,
    BaselineTraced,
    Experimental,
    Precomputed,
    /// Experimental strategy failed; baseline answered.
    ExperimentalFallback,
    /// Precomputed tree unusable; baseline answered.
    PrecomputedFallback,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Baseline             => "baseline",
            Algorithm::BaselineTraced       => "baseline-traced",
            Algorithm::Experimental         => "experimental",
            Algorithm::Precomputed          => "precomputed",
            Algorithm::ExperimentalFallback => "baseline (experimental fallback)",
            Algorithm::PrecomputedFallback  => "baseline (precomputed fallback)",
        }
    }

    pub fn is_fallback(self) -> bool {
        matches!(self, Algorithm::ExperimentalFallback | Algorithm::PrecomputedFallback)
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path together with the algorithm that produced it.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub path: ShortestPath,
    pub algorithm: Algorithm,
}

// ── PathSolver ────────────────────────────────────────────────────────────────

/// Holds one instance of every strategy and dispatches between them.
///
/// Baseline and traced are always available.  Experimental and precomputed
/// are optional; requesting an unconfigured one falls back to baseline.
#[derive(Default)]
pub struct PathSolver {
    baseline:     BaselineStrategy,
    traced:       TracedStrategy,
    experimental: Option<Box<dyn PathStrategy>>,
    precomputed:  Option<PrecomputedStrategy>,
}

impl PathSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_experimental(mut self, strategy: impl PathStrategy + 'static) -> Self {
        self.experimental = Some(Box::new(strategy));
        self
    }

    pub fn with_precomputed(mut self, cache: Arc<DestinationTreeCache>) -> Self {
        self.precomputed = Some(PrecomputedStrategy::new(cache));
        self
    }

    pub fn tree_cache(&self) -> Option<&Arc<DestinationTreeCache>> {
        self.precomputed.as_ref().map(|p| p.cache())
    }

    /// Pick the strategy to run for a request.
    ///
    /// Baseline requests whose destination is the landmark (within
    /// tolerance) are upgraded to the precomputed tree, unless closures are
    /// in effect.  Everything else runs as requested.
    pub fn select(&self, requested: StrategyKind, destination: GeoPoint, closures_applied: bool) -> StrategyKind {
        let at_landmark = self
            .tree_cache()
            .is_some_and(|c| c.landmark().matches(destination));
        match requested {
            StrategyKind::Baseline if at_landmark && !closures_applied => StrategyKind::Precomputed,
            other => other,
        }
    }

    /// The graph node the landmark snaps to, if `destination` counts as the
    /// landmark.  A destination inside the tolerance may snap to a nearer
    /// node; precomputed queries must end at this one instead.
    pub fn landmark_node(&self, graph: &RoadGraph, destination: GeoPoint) -> Option<NodeId> {
        let landmark = self.tree_cache()?.landmark();
        if !landmark.matches(destination) {
            return None;
        }
        graph.snap_to_node(landmark.point)
    }

    /// Run `kind` and fall back to baseline if it fails.
    pub fn resolve(
        &self,
        graph: &RoadGraph,
        source: NodeId,
        destination: NodeId,
        kind: StrategyKind,
    ) -> RoutingResult<Resolution> {
        if graph.is_empty() {
            return Err(RoutingError::EmptyCorridor);
        }

        let (path, algorithm) = match kind {
            StrategyKind::Baseline => (self.baseline.solve(graph, source, destination)?, Algorithm::Baseline),
            StrategyKind::Traced => (self.traced.solve(graph, source, destination)?, Algorithm::BaselineTraced),
            StrategyKind::Experimental => {
                let (label, attempt) = match &self.experimental {
                    Some(s) => (s.label(), s.solve(graph, source, destination)),
                    None => ("experimental", Err(RoutingError::Solver("no experimental backend configured".into()))),
                };
                self.or_fallback(graph, source, destination, label, attempt, (Algorithm::Experimental, Algorithm::ExperimentalFallback))?
            }
            StrategyKind::Precomputed => {
                let (label, attempt) = match &self.precomputed {
                    Some(s) => (s.label(), s.solve(graph, source, destination)),
                    None => ("precomputed", Err(RoutingError::TreeMiss("no landmark configured".into()))),
                };
                self.or_fallback(graph, source, destination, label, attempt, (Algorithm::Precomputed, Algorithm::PrecomputedFallback))?
            }
        };

        debug!(
            algorithm = algorithm.as_str(),
            hops = path.nodes.len().saturating_sub(1),
            "path resolved"
        );
        Ok(Resolution { path, algorithm })
    }

    fn or_fallback(
        &self,
        graph: &RoadGraph,
        source: NodeId,
        destination: NodeId,
        label: &'static str,
        attempt: RoutingResult<ShortestPath>,
        (success, fallback): (Algorithm, Algorithm),
    ) -> RoutingResult<(ShortestPath, Algorithm)> {
        match attempt {
            Ok(path) => Ok((path, success)),
            Err(e) => {
                warn!(strategy = label, error = %e, "strategy failed, falling back to baseline");
                Ok((self.baseline.solve(graph, source, destination)?, fallback))
            }
        }
    }
}
