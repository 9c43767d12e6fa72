//! Route request and response shapes.

use serde::{Deserialize, Serialize};

use aegis_core::{GeoPoint, Scenario};
use aegis_nav::{NavigationStep, Pivot, RoutePackage};

/// One route query.
///
/// `scenario` and `strategy` are free text: the scenario is classified by
/// keyword, and an unknown strategy name falls back to baseline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: GeoPoint,
    pub end: GeoPoint,
    #[serde(default)]
    pub scenario: String,
    #[serde(default)]
    pub strategy: String,
    /// Points whose surroundings are impassable for this request only.
    #[serde(default)]
    pub closures: Vec<GeoPoint>,
    /// Return the search's explored edges (runs the traced strategy).
    #[serde(default)]
    pub trace: bool,
}

impl RouteRequest {
    pub fn new(start: GeoPoint, end: GeoPoint) -> Self {
        Self {
            start,
            end,
            scenario: String::new(),
            strategy: String::new(),
            closures: Vec::new(),
            trace: false,
        }
    }

    pub fn with_scenario(mut self, scenario: impl Into<String>) -> Self {
        self.scenario = scenario.into();
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = strategy.into();
        self
    }

    pub fn with_closure(mut self, point: GeoPoint) -> Self {
        self.closures.push(point);
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

/// A fully derived route.
#[derive(Clone, Debug, Serialize)]
pub struct RouteResponse {
    pub algorithm: String,
    pub scenario: Scenario,
    /// Display form of the corridor the route was computed in.
    pub corridor: String,
    pub snapped_start: GeoPoint,
    pub snapped_end: GeoPoint,
    pub total_distance_m: f64,
    pub total_time_s: f64,
    pub polyline: Vec<GeoPoint>,
    pub cumulative_distance_m: Vec<f64>,
    pub cumulative_time_s: Vec<f64>,
    pub steps: Vec<NavigationStep>,
    pub pivots: Vec<Pivot>,
    pub narrative: Vec<String>,
    /// Explored edges as `[from, to]` coordinate pairs, in search order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<[GeoPoint; 2]>>,
}

impl RouteResponse {
    pub(crate) fn assemble(
        package: RoutePackage,
        corridor: String,
        snapped: (GeoPoint, GeoPoint),
        trace: Option<Vec<[GeoPoint; 2]>>,
    ) -> Self {
        Self {
            total_distance_m: package.total_distance_m(),
            total_time_s: package.total_time_s(),
            algorithm: package.algorithm,
            scenario: package.scenario,
            corridor,
            snapped_start: snapped.0,
            snapped_end: snapped.1,
            polyline: package.polyline,
            cumulative_distance_m: package.cumulative_distance_m,
            cumulative_time_s: package.cumulative_time_s,
            steps: package.steps,
            pivots: package.pivots,
            narrative: package.narrative,
            trace,
        }
    }
}
