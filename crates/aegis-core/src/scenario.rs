//! Emergency scenario classification.
//!
//! The dispatcher passes a free-text incident label (e.g. `"Cardiac arrest,
//! 64M"`).  Classification only affects the speed multiplier applied when
//! estimating arrival times; path selection is purely distance-based.

use std::str::FromStr;

/// Incident category driving the ETA speed multiplier.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Scenario {
    /// Cardiac arrest and other time-critical cardiac events.
    CardiacArrest,
    /// Trauma: collisions, falls, penetrating injuries.
    Trauma,
    /// Anything else.
    #[default]
    General,
}

impl Scenario {
    /// Classify a free-text incident label.  Unknown labels map to `General`.
    pub fn classify(label: &str) -> Scenario {
        let l = label.to_ascii_lowercase();
        if l.contains("cardiac") || l.contains("arrest") {
            Scenario::CardiacArrest
        } else if l.contains("trauma") {
            Scenario::Trauma
        } else {
            Scenario::General
        }
    }

    /// Multiplier applied to derived road speeds for this scenario.
    pub fn speed_multiplier(self) -> f64 {
        match self {
            Scenario::CardiacArrest => 1.10,
            Scenario::Trauma        => 1.05,
            Scenario::General       => 1.00,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::CardiacArrest => "cardiac_arrest",
            Scenario::Trauma        => "trauma",
            Scenario::General       => "general",
        }
    }
}

impl FromStr for Scenario {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Scenario::classify(s))
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
