//! Route package assembly.

use tracing::debug;

use aegis_core::{GeoPoint, NodeId, Scenario};
use aegis_spatial::RoadGraph;

use crate::pivots::{find_pivots, Pivot};
use crate::polyline::expand;
use crate::steps::{build_steps, NavigationStep};
use crate::timeline::{cumulative_distance, cumulative_time};
use crate::NavResult;

/// Everything a dispatch console needs to draw and narrate one route.
///
/// `polyline`, `cumulative_distance_m` and `cumulative_time_s` always have
/// the same length.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RoutePackage {
    pub scenario: Scenario,
    pub algorithm: String,
    pub polyline: Vec<GeoPoint>,
    pub cumulative_distance_m: Vec<f64>,
    pub cumulative_time_s: Vec<f64>,
    pub steps: Vec<NavigationStep>,
    pub pivots: Vec<Pivot>,
    pub narrative: Vec<String>,
}

impl RoutePackage {
    pub fn total_distance_m(&self) -> f64 {
        self.cumulative_distance_m.last().copied().unwrap_or(0.0)
    }

    pub fn total_time_s(&self) -> f64 {
        self.cumulative_time_s.last().copied().unwrap_or(0.0)
    }
}

fn format_eta(seconds: f64) -> String {
    let total = seconds.round().max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

fn scenario_header(scenario: Scenario) -> &'static str {
    match scenario {
        Scenario::CardiacArrest => "Priority response: cardiac arrest",
        Scenario::Trauma        => "Priority response: trauma",
        Scenario::General       => "Emergency response",
    }
}

/// Turns a node path into a [`RoutePackage`].
#[derive(Copy, Clone, Debug, Default)]
pub struct NarrativeBuilder {
    scenario: Scenario,
}

impl NarrativeBuilder {
    pub fn new(scenario: Scenario) -> Self {
        Self { scenario }
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    /// Build the full package.  Fails as a whole if any hop of `nodes` has
    /// no edge in `graph`.
    pub fn build(&self, graph: &RoadGraph, nodes: &[NodeId], algorithm: &str) -> NavResult<RoutePackage> {
        let expansion = expand(graph, nodes, self.scenario)?;
        let cum_dist = cumulative_distance(&expansion.points);
        let cum_time = cumulative_time(&cum_dist, &expansion.spans);
        let steps = build_steps(&expansion.spans, &cum_dist);
        let pivots = find_pivots(graph, nodes);

        let total_m = cum_dist.last().copied().unwrap_or(0.0);
        let total_s = cum_time.last().copied().unwrap_or(0.0);

        let mut narrative = Vec::with_capacity(steps.len() + 3);
        narrative.push(format!("{} ({algorithm} route)", scenario_header(self.scenario)));
        narrative.push(format!(
            "{:.2} km, ETA {}",
            total_m / 1_000.0,
            format_eta(total_s)
        ));
        narrative.extend(steps.iter().map(|s| format!("{}. {}", s.index + 1, s.instruction)));
        narrative.push("Arrive at destination".to_string());

        debug!(
            points = expansion.points.len(),
            steps = steps.len(),
            pivots = pivots.len(),
            total_m,
            "route package built"
        );

        Ok(RoutePackage {
            scenario: self.scenario,
            algorithm: algorithm.to_string(),
            polyline: expansion.points,
            cumulative_distance_m: cum_dist,
            cumulative_time_s: cum_time,
            steps,
            pivots,
            narrative,
        })
    }
}
