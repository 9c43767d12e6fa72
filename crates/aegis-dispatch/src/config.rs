//! Service configuration, read from JSON.
//!
//! Every field has a default, so `{}` is a complete configuration:
//!
//! ```json
//! {
//!   "corridor": { "padding_deg": 0.02, "capacity": 16 },
//!   "closures": { "radius_m": 200.0 },
//!   "landmark": { "lat": 43.8561, "lon": -79.3370, "tolerance_m": 75.0 },
//!   "solver":   { "program": "/opt/aegis/bin/solve", "args": [], "timeout_ms": 20000 },
//!   "lookup":   { "min_interval_ms": 1100, "cache_capacity": 200,
//!                 "region": "Ontario", "autocomplete_limit": 5 }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use aegis_core::GeoPoint;
use aegis_lookup::{AddressProvider, LookupThrottle};
use aegis_routing::ProcessBackend;

use crate::{DispatchError, DispatchResult};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub corridor: CorridorConfig,
    pub closures: ClosureConfig,
    pub landmark: Option<LandmarkConfig>,
    pub solver:   SolverConfig,
    pub lookup:   LookupConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorridorConfig {
    /// Degrees added on every side of the start/end rectangle.
    pub padding_deg: f64,
    /// Corridors kept before least-recently-used eviction.
    pub capacity: usize,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self { padding_deg: 0.02, capacity: aegis_spatial::DEFAULT_CORRIDOR_CAPACITY }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosureConfig {
    pub radius_m: f64,
}

impl Default for ClosureConfig {
    fn default() -> Self {
        Self { radius_m: aegis_spatial::DEFAULT_CLOSURE_RADIUS_M }
    }
}

fn default_landmark_tolerance() -> f64 {
    75.0
}

/// The fixed destination served from a precomputed tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandmarkConfig {
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_landmark_tolerance")]
    pub tolerance_m: f64,
}

impl LandmarkConfig {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// External solver executable; no experimental strategy when absent.
    pub program: Option<PathBuf>,
    pub args: Vec<String>,
    pub timeout_ms: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            program: None,
            args: Vec::new(),
            timeout_ms: aegis_routing::DEFAULT_SOLVER_TIMEOUT.as_millis() as u64,
        }
    }
}

impl SolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn backend(&self) -> Option<ProcessBackend> {
        self.program.as_ref().map(|p| {
            ProcessBackend::new(p)
                .with_args(self.args.iter().cloned())
                .with_timeout(self.timeout())
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub min_interval_ms: u64,
    pub cache_capacity: usize,
    pub region: Option<String>,
    pub autocomplete_limit: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: aegis_lookup::DEFAULT_MIN_INTERVAL.as_millis() as u64,
            cache_capacity: aegis_lookup::DEFAULT_LOOKUP_CACHE_CAPACITY,
            region: None,
            autocomplete_limit: aegis_lookup::DEFAULT_AUTOCOMPLETE_LIMIT,
        }
    }
}

impl LookupConfig {
    /// Wrap `provider` in a throttle configured from this section.
    pub fn throttle<A: AddressProvider>(&self, provider: A) -> LookupThrottle<A> {
        let throttle = LookupThrottle::new(provider)
            .with_min_interval(Duration::from_millis(self.min_interval_ms))
            .with_cache_capacity(self.cache_capacity)
            .with_limit(self.autocomplete_limit);
        match &self.region {
            Some(region) => throttle.with_region(region.clone()),
            None => throttle,
        }
    }
}

impl DispatchConfig {
    pub fn from_json_str(json: &str) -> DispatchResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| DispatchError::Config(format!("malformed configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> DispatchResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| DispatchError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Reject values no request could succeed with.
    pub fn validate(&self) -> DispatchResult<()> {
        let bad = |msg: String| Err(DispatchError::Config(msg));
        if !(self.corridor.padding_deg.is_finite() && self.corridor.padding_deg >= 0.0) {
            return bad(format!("corridor.padding_deg must be >= 0, got {}", self.corridor.padding_deg));
        }
        if self.corridor.capacity == 0 {
            return bad("corridor.capacity must be at least 1".into());
        }
        if !(self.closures.radius_m.is_finite() && self.closures.radius_m > 0.0) {
            return bad(format!("closures.radius_m must be > 0, got {}", self.closures.radius_m));
        }
        if let Some(l) = &self.landmark {
            if GeoPoint::checked(l.lat, l.lon).is_err() {
                return bad(format!("landmark ({}, {}) is not a valid coordinate", l.lat, l.lon));
            }
            if !(l.tolerance_m.is_finite() && l.tolerance_m >= 0.0) {
                return bad(format!("landmark.tolerance_m must be >= 0, got {}", l.tolerance_m));
            }
        }
        if self.solver.timeout_ms == 0 {
            return bad("solver.timeout_ms must be positive".into());
        }
        if self.lookup.cache_capacity == 0 {
            return bad("lookup.cache_capacity must be at least 1".into());
        }
        Ok(())
    }
}
