//! Turn-by-turn steps.
//!
//! A new step starts wherever the street name changes or the heading turns
//! by 35° or more between consecutive edges.  Steps shorter than 30 m are
//! folded into the previous step when both are on the same street.

use aegis_core::bearing_delta;

use crate::polyline::EdgeSpan;

/// Heading change (degrees) that starts a new step on the same street.
const TURN_THRESHOLD_DEG: f64 = 35.0;
/// Steps shorter than this are merge candidates.
const MIN_STEP_M: f64 = 30.0;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Maneuver {
    Depart,
    Continue,
    SlightRight,
    SlightLeft,
    Right,
    Left,
    #[cfg_attr(feature = "serde", serde(rename = "uturn"))]
    UTurn,
}

impl Maneuver {
    /// Classify a signed heading change (positive = clockwise = right).
    pub fn from_delta(delta_deg: f64) -> Maneuver {
        let turn = delta_deg.abs();
        let right = delta_deg > 0.0;
        match turn {
            t if t < 20.0  => Maneuver::Continue,
            t if t < 60.0  => if right { Maneuver::SlightRight } else { Maneuver::SlightLeft },
            t if t < 135.0 => if right { Maneuver::Right } else { Maneuver::Left },
            _              => Maneuver::UTurn,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Maneuver::Depart      => "depart",
            Maneuver::Continue    => "continue",
            Maneuver::SlightRight => "slight_right",
            Maneuver::SlightLeft  => "slight_left",
            Maneuver::Right       => "right",
            Maneuver::Left        => "left",
            Maneuver::UTurn       => "uturn",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Maneuver::Depart      => "Depart on",
            Maneuver::Continue    => "Continue onto",
            Maneuver::SlightRight => "Bear slightly right onto",
            Maneuver::SlightLeft  => "Bear slightly left onto",
            Maneuver::Right       => "Turn right onto",
            Maneuver::Left        => "Turn left onto",
            Maneuver::UTurn       => "Make a U-turn onto",
        }
    }
}

impl std::fmt::Display for Maneuver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One instruction covering `[start_m, end_m]` of the route.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NavigationStep {
    pub index: usize,
    pub street: String,
    pub maneuver: Maneuver,
    pub start_m: f64,
    pub end_m: f64,
    pub instruction: String,
}

impl NavigationStep {
    pub fn length_m(&self) -> f64 {
        self.end_m - self.start_m
    }
}

fn format_distance(m: f64) -> String {
    if m >= 1_000.0 {
        format!("{:.1} km", m / 1_000.0)
    } else {
        format!("{:.0} m", m)
    }
}

/// Group `spans` into steps.  The steps partition
/// `[0, cum_dist[last]]` contiguously; an empty span list gives no steps.
pub fn build_steps(spans: &[EdgeSpan], cum_dist: &[f64]) -> Vec<NavigationStep> {
    let Some(first) = spans.first() else {
        return Vec::new();
    };

    let open = |street: &str, maneuver, start_m| NavigationStep {
        index: 0,
        street: street.to_string(),
        maneuver,
        start_m,
        end_m: start_m,
        instruction: String::new(),
    };

    let mut raw = Vec::new();
    let mut current = open(&first.name, Maneuver::Depart, cum_dist[first.start]);

    for pair in spans.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let delta = bearing_delta(prev.bearing_deg, next.bearing_deg);
        if next.name != current.street || delta.abs() >= TURN_THRESHOLD_DEG {
            let boundary = cum_dist[next.start];
            current.end_m = boundary;
            raw.push(current);
            current = open(&next.name, Maneuver::from_delta(delta), boundary);
        }
    }
    if let Some(last) = spans.last() {
        current.end_m = cum_dist[last.end];
    }
    raw.push(current);

    // Fold short same-street steps into their predecessor.
    let mut steps: Vec<NavigationStep> = Vec::with_capacity(raw.len());
    for step in raw {
        match steps.last_mut() {
            Some(prev) if step.length_m() < MIN_STEP_M && prev.street == step.street => {
                prev.end_m = step.end_m;
            }
            _ => steps.push(step),
        }
    }

    for (i, step) in steps.iter_mut().enumerate() {
        step.index = i;
        step.instruction = format!(
            "{} {} for {}",
            step.maneuver.verb(),
            step.street,
            format_distance(step.length_m())
        );
    }
    steps
}
