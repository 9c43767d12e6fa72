//! Cumulative distance and time along an expanded polyline.

use aegis_core::GeoPoint;

use crate::polyline::EdgeSpan;

/// Slowest speed used for timing, in m/s; guards against zero speeds.
const MIN_SPEED_MPS: f64 = 0.1;

/// Haversine running total; `out[0] == 0`, `out.len() == points.len()`.
pub fn cumulative_distance(points: &[GeoPoint]) -> Vec<f64> {
    let mut out = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            total += points[i - 1].distance_m(*p);
        }
        out.push(total);
    }
    out
}

/// Running travel time in seconds for every point.
///
/// Each span's duration is its distance over its speed.  Points inside a
/// span get a share of that duration proportional to the distance covered
/// so far.  The result is clamped to be non-decreasing.
pub fn cumulative_time(cum_dist: &[f64], spans: &[EdgeSpan]) -> Vec<f64> {
    let mut out = vec![0.0; cum_dist.len()];

    for span in spans {
        let t0 = out[span.start];
        let d0 = cum_dist[span.start];
        let span_m = cum_dist[span.end] - d0;
        let duration = span_m / (span.speed_kmh / 3.6).max(MIN_SPEED_MPS);

        for i in span.start + 1..=span.end {
            let frac = if span_m > 0.0 { (cum_dist[i] - d0) / span_m } else { 1.0 };
            out[i] = t0 + duration * frac;
        }
    }

    for i in 1..out.len() {
        if out[i] < out[i - 1] {
            out[i] = out[i - 1];
        }
    }
    out
}
