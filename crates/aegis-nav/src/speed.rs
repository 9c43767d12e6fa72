//! Edge speed derivation.
//!
//! Speeds only drive arrival-time estimates; routing weights are lengths.

use aegis_core::Scenario;
use aegis_spatial::EdgeAttrs;

const KMH_PER_MPH: f64 = 1.609_344;

/// Parse an OSM-style `maxspeed` value into km/h.
///
/// Accepts `"50"`, `"50 km/h"`, `"30 mph"`, `"30mph"` and multi-values like
/// `"50;60"` (first wins).  Symbolic values (`"none"`, `"signals"`,
/// `"RU:urban"`) return `None`.
pub fn parse_maxspeed_kmh(tag: &str) -> Option<f64> {
    let first = tag.split(';').next()?.trim();
    let digits: String = first
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value: f64 = digits.parse().ok()?;
    if value <= 0.0 {
        return None;
    }
    if first[digits.len()..].trim().eq_ignore_ascii_case("mph") {
        Some(value * KMH_PER_MPH)
    } else {
        Some(value)
    }
}

/// Default speed in km/h for a `highway=*` class.
pub fn class_speed_kmh(highway: Option<&str>) -> f64 {
    match highway.unwrap_or("") {
        "motorway"    => 100.0,
        "trunk"       => 80.0,
        "primary"     => 70.0,
        "secondary"   => 60.0,
        "tertiary"    => 55.0,
        "residential" => 40.0,
        "service"     => 25.0,
        _             => 50.0,
    }
}

/// Speed in km/h used for the edge's travel time, including the scenario
/// multiplier.
pub fn edge_speed_kmh(attrs: &EdgeAttrs, scenario: Scenario) -> f64 {
    let base = attrs
        .maxspeed
        .as_deref()
        .and_then(parse_maxspeed_kmh)
        .unwrap_or_else(|| class_speed_kmh(attrs.highway.as_deref()));
    base * scenario.speed_multiplier()
}
