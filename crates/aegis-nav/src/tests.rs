//! Unit tests for aegis-nav.

#[cfg(test)]
pub(crate) mod helpers {
    use aegis_core::{GeoPoint, NodeId};
    use aegis_spatial::{EdgeAttrs, RoadGraph, RoadGraphBuilder};

    pub fn street(name: &str) -> EdgeAttrs {
        EdgeAttrs::default().with_name(name).with_highway("residential")
    }

    /// ```text
    ///   3 ────────── 4
    ///   │            │
    ///   0 ──── 1 ──── 2
    /// ```
    pub fn grid_graph() -> (RoadGraph, [NodeId; 5]) {
        let mut b = RoadGraphBuilder::new();
        let n0 = b.add_node(GeoPoint::new(43.850, -79.340));
        let n1 = b.add_node(GeoPoint::new(43.850, -79.335));
        let n2 = b.add_node(GeoPoint::new(43.850, -79.330));
        let n3 = b.add_node(GeoPoint::new(43.855, -79.340));
        let n4 = b.add_node(GeoPoint::new(43.855, -79.330));
        b.add_straight_road(n0, n1, street("Main Street"));
        b.add_straight_road(n1, n2, street("Main Street"));
        b.add_straight_road(n2, n4, street("Oak Avenue"));
        b.add_straight_road(n0, n3, street("Elm Road"));
        b.add_road(n3, n4, 1_200.0, street("Ridge Line"));
        (b.build(), [n0, n1, n2, n3, n4])
    }

    pub fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "{a} vs {b} (tol {tol})");
    }
}

// ── Speeds ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod speed {
    use aegis_core::Scenario;
    use aegis_spatial::EdgeAttrs;

    use super::helpers::assert_close;
    use crate::{class_speed_kmh, edge_speed_kmh, parse_maxspeed_kmh};

    #[test]
    fn parses_numeric_tags() {
        assert_eq!(parse_maxspeed_kmh("50"), Some(50.0));
        assert_eq!(parse_maxspeed_kmh("50 km/h"), Some(50.0));
        assert_eq!(parse_maxspeed_kmh("50;60"), Some(50.0));
        assert_close(parse_maxspeed_kmh("30 mph").unwrap(), 48.280_32, 1e-6);
        assert_close(parse_maxspeed_kmh("30mph").unwrap(), 48.280_32, 1e-6);
    }

    #[test]
    fn symbolic_tags_are_ignored() {
        assert_eq!(parse_maxspeed_kmh("none"), None);
        assert_eq!(parse_maxspeed_kmh("signals"), None);
        assert_eq!(parse_maxspeed_kmh(""), None);
        assert_eq!(parse_maxspeed_kmh("0"), None);
    }

    #[test]
    fn class_defaults() {
        assert_eq!(class_speed_kmh(Some("motorway")), 100.0);
        assert_eq!(class_speed_kmh(Some("residential")), 40.0);
        assert_eq!(class_speed_kmh(Some("service")), 25.0);
        assert_eq!(class_speed_kmh(Some("track")), 50.0);
        assert_eq!(class_speed_kmh(None), 50.0);
    }

    #[test]
    fn tag_beats_class_and_scenario_scales() {
        let tagged = EdgeAttrs::default().with_highway("primary").with_maxspeed("60");
        assert_eq!(edge_speed_kmh(&tagged, Scenario::General), 60.0);

        let untagged = EdgeAttrs::default().with_highway("residential");
        assert_close(edge_speed_kmh(&untagged, Scenario::CardiacArrest), 44.0, 1e-9);
        assert_close(edge_speed_kmh(&untagged, Scenario::Trauma), 42.0, 1e-9);
    }
}

// ── Polyline expansion ────────────────────────────────────────────────────────

#[cfg(test)]
mod polyline {
    use aegis_core::{GeoPoint, Scenario};
    use aegis_spatial::{EdgeAttrs, RoadGraphBuilder};

    use super::helpers::{grid_graph, street};
    use crate::{expand, NavError, UNNAMED_ROAD};

    #[test]
    fn straight_segments_share_boundaries() {
        let (g, [n0, n1, n2, _, n4]) = grid_graph();
        let x = expand(&g, &[n0, n1, n2, n4], Scenario::General).unwrap();
        assert_eq!(x.points.len(), 4);
        assert_eq!(x.spans.len(), 3);
        for pair in x.spans.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(x.spans[2].name, "Oak Avenue");
        assert!((x.spans[0].bearing_deg - 90.0).abs() < 0.5);
        assert!(x.spans[2].bearing_deg < 0.5 || x.spans[2].bearing_deg > 359.5);
    }

    #[test]
    fn geometry_drops_duplicated_leading_point() {
        let mut b = RoadGraphBuilder::new();
        let a = GeoPoint::new(43.850, -79.340);
        let m = GeoPoint::new(43.851, -79.338);
        let c = GeoPoint::new(43.850, -79.336);
        let d = GeoPoint::new(43.850, -79.332);
        let na = b.add_node(a);
        let nc = b.add_node(c);
        let nd = b.add_node(d);
        b.add_directed_edge(na, nc, 400.0, street("Bend Road").with_geometry(vec![a, m, c]));
        b.add_directed_edge(nc, nd, 320.0, street("Bend Road"));
        let g = b.build();

        let x = expand(&g, &[na, nc, nd], Scenario::General).unwrap();
        assert_eq!(x.points, vec![a, m, c, d]);
        assert_eq!((x.spans[0].start, x.spans[0].end), (0, 2));
        assert_eq!((x.spans[1].start, x.spans[1].end), (2, 3));
    }

    #[test]
    fn shortest_parallel_edge_wins() {
        let mut b = RoadGraphBuilder::new();
        let p = b.add_node(GeoPoint::new(43.850, -79.340));
        let q = b.add_node(GeoPoint::new(43.850, -79.330));
        b.add_directed_edge(p, q, 900.0, street("Long Way"));
        b.add_directed_edge(p, q, 810.0, street("Short Way"));
        let g = b.build();

        let x = expand(&g, &[p, q], Scenario::General).unwrap();
        assert_eq!(x.spans[0].name, "Short Way");
    }

    #[test]
    fn display_name_falls_back_to_ref_then_placeholder() {
        let mut b = RoadGraphBuilder::new();
        let p = b.add_node(GeoPoint::new(43.850, -79.340));
        let q = b.add_node(GeoPoint::new(43.850, -79.335));
        let r = b.add_node(GeoPoint::new(43.850, -79.330));
        b.add_straight_road(p, q, EdgeAttrs::default().with_ref("ON-7"));
        b.add_straight_road(q, r, EdgeAttrs::default());
        let g = b.build();

        let x = expand(&g, &[p, q, r], Scenario::General).unwrap();
        assert_eq!(x.spans[0].name, "ON-7");
        assert_eq!(x.spans[1].name, UNNAMED_ROAD);
    }

    #[test]
    fn blank_name_defers_to_ref() {
        let mut b = RoadGraphBuilder::new();
        let p = b.add_node(GeoPoint::new(43.850, -79.340));
        let q = b.add_node(GeoPoint::new(43.850, -79.335));
        let r = b.add_node(GeoPoint::new(43.850, -79.330));
        b.add_straight_road(p, q, EdgeAttrs::default().with_name("").with_ref("HWY 7"));
        b.add_straight_road(q, r, EdgeAttrs::default().with_name("  ").with_ref(" "));
        let g = b.build();

        let x = expand(&g, &[p, q, r], Scenario::General).unwrap();
        assert_eq!(x.spans[0].name, "HWY 7");
        assert_eq!(x.spans[1].name, UNNAMED_ROAD);
    }

    #[test]
    fn single_node_path_is_one_point() {
        let (g, [n0, ..]) = grid_graph();
        let x = expand(&g, &[n0], Scenario::General).unwrap();
        assert_eq!(x.points.len(), 1);
        assert!(x.spans.is_empty());
    }

    #[test]
    fn empty_and_disconnected_paths_fail() {
        let (g, [n0, _, _, _, n4]) = grid_graph();
        assert!(matches!(expand(&g, &[], Scenario::General), Err(NavError::EmptyPath)));
        assert!(matches!(
            expand(&g, &[n0, n4], Scenario::General),
            Err(NavError::MissingEdge { .. })
        ));
    }
}

// ── Timeline ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod timeline {
    use aegis_core::Scenario;

    use super::helpers::{assert_close, grid_graph};
    use crate::{cumulative_distance, cumulative_time, expand, EdgeSpan};

    #[test]
    fn arrays_match_polyline_and_never_decrease() {
        let (g, [n0, n1, n2, _, n4]) = grid_graph();
        let x = expand(&g, &[n0, n1, n2, n4], Scenario::General).unwrap();
        let d = cumulative_distance(&x.points);
        let t = cumulative_time(&d, &x.spans);

        assert_eq!(d.len(), x.points.len());
        assert_eq!(t.len(), x.points.len());
        assert_eq!(d[0], 0.0);
        assert_eq!(t[0], 0.0);
        assert!(d.windows(2).all(|w| w[1] >= w[0]));
        assert!(t.windows(2).all(|w| w[1] >= w[0]));

        // All residential: 40 km/h throughout.
        assert_close(t[3], d[3] / (40.0 / 3.6), 1e-6);
    }

    #[test]
    fn interior_points_share_span_time_by_distance() {
        let d = vec![0.0, 100.0, 400.0];
        let span = EdgeSpan {
            edge: aegis_core::EdgeId(0),
            start: 0,
            end: 2,
            name: "X".into(),
            speed_kmh: 36.0,
            bearing_deg: 0.0,
        };
        let t = cumulative_time(&d, &[span]);
        assert_close(t[1], 10.0, 1e-9);
        assert_close(t[2], 40.0, 1e-9);
    }

    #[test]
    fn zero_speed_is_floored() {
        let d = vec![0.0, 1.0];
        let span = EdgeSpan {
            edge: aegis_core::EdgeId(0),
            start: 0,
            end: 1,
            name: "X".into(),
            speed_kmh: 0.0,
            bearing_deg: 0.0,
        };
        let t = cumulative_time(&d, &[span]);
        assert_close(t[1], 10.0, 1e-9);
    }

    #[test]
    fn cardiac_scenario_is_faster() {
        let (g, [n0, n1, n2, _, n4]) = grid_graph();
        let path = [n0, n1, n2, n4];
        let total = |scenario| {
            let x = expand(&g, &path, scenario).unwrap();
            let d = cumulative_distance(&x.points);
            *cumulative_time(&d, &x.spans).last().unwrap()
        };
        assert_close(total(Scenario::CardiacArrest), total(Scenario::General) / 1.10, 1e-6);
    }
}

// ── Steps ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod steps {
    use aegis_core::{GeoPoint, Scenario};
    use aegis_spatial::RoadGraphBuilder;

    use super::helpers::{assert_close, grid_graph, street};
    use crate::{build_steps, cumulative_distance, expand, Maneuver};

    #[test]
    fn maneuver_thresholds() {
        assert_eq!(Maneuver::from_delta(10.0), Maneuver::Continue);
        assert_eq!(Maneuver::from_delta(-19.9), Maneuver::Continue);
        assert_eq!(Maneuver::from_delta(40.0), Maneuver::SlightRight);
        assert_eq!(Maneuver::from_delta(-40.0), Maneuver::SlightLeft);
        assert_eq!(Maneuver::from_delta(90.0), Maneuver::Right);
        assert_eq!(Maneuver::from_delta(-90.0), Maneuver::Left);
        assert_eq!(Maneuver::from_delta(150.0), Maneuver::UTurn);
        assert_eq!(Maneuver::from_delta(-180.0), Maneuver::UTurn);
    }

    #[test]
    fn name_change_and_turn_open_steps() {
        let (g, [n0, n1, n2, _, n4]) = grid_graph();
        let x = expand(&g, &[n0, n1, n2, n4], Scenario::General).unwrap();
        let d = cumulative_distance(&x.points);
        let steps = build_steps(&x.spans, &d);

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].maneuver, Maneuver::Depart);
        assert_eq!(steps[0].street, "Main Street");
        assert_eq!(steps[1].maneuver, Maneuver::Left);
        assert_eq!(steps[1].street, "Oak Avenue");
        assert!(steps[1].instruction.starts_with("Turn left onto Oak Avenue"));
    }

    #[test]
    fn steps_partition_total_distance() {
        let (g, [n0, n1, n2, _, n4]) = grid_graph();
        let x = expand(&g, &[n0, n1, n2, n4], Scenario::General).unwrap();
        let d = cumulative_distance(&x.points);
        let steps = build_steps(&x.spans, &d);

        assert_eq!(steps[0].start_m, 0.0);
        for pair in steps.windows(2) {
            assert_eq!(pair[0].end_m, pair[1].start_m);
        }
        let sum: f64 = steps.iter().map(|s| s.length_m()).sum();
        assert_close(sum, *d.last().unwrap(), 1e-6);
    }

    #[test]
    fn short_same_street_jog_is_merged() {
        // 400 m east, a 20 m jog to the north-east, 400 m east again.
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(43.850, -79.340));
        let bb = b.add_node(GeoPoint::new(43.850, -79.335));
        let c = b.add_node(GeoPoint::new(43.850_127, -79.334_824));
        let e = b.add_node(GeoPoint::new(43.850_127, -79.329_824));
        b.add_straight_road(a, bb, street("Main Street"));
        b.add_straight_road(bb, c, street("Main Street"));
        b.add_straight_road(c, e, street("Main Street"));
        let g = b.build();

        let x = expand(&g, &[a, bb, c, e], Scenario::General).unwrap();
        let d = cumulative_distance(&x.points);
        let steps = build_steps(&x.spans, &d);

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].maneuver, Maneuver::Depart);
        assert_close(steps[0].end_m, d[2], 1e-9);
        assert_eq!(steps[1].maneuver, Maneuver::SlightRight);
        assert_eq!(steps[1].index, 1);
    }

    #[test]
    fn no_spans_no_steps() {
        assert!(build_steps(&[], &[0.0]).is_empty());
    }
}

// ── Pivots ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pivots {
    use aegis_core::{GeoPoint, NodeId};
    use aegis_spatial::{RoadGraph, RoadGraphBuilder};

    use super::helpers::{grid_graph, street};
    use crate::{find_pivots, PIVOT_CATEGORY};

    /// Three junctions in a row, each with two dead-end spurs.
    fn spine() -> (RoadGraph, Vec<NodeId>) {
        let mut b = RoadGraphBuilder::new();
        let mut spine = Vec::new();
        for i in 0..3 {
            let lon = -79.340 + 0.005 * f64::from(i);
            let j = b.add_node(GeoPoint::new(43.850, lon));
            let north = b.add_node(GeoPoint::new(43.852, lon));
            let south = b.add_node(GeoPoint::new(43.848, lon));
            b.add_straight_road(j, north, street("Spur"));
            b.add_straight_road(j, south, street("Spur"));
            if let Some(&prev) = spine.last() {
                b.add_straight_road(prev, j, street("Spine"));
            }
            spine.push(j);
        }
        (b.build(), spine)
    }

    #[test]
    fn at_most_two_in_travel_order() {
        let (g, path) = spine();
        let pivots = find_pivots(&g, &path);
        assert_eq!(pivots.len(), 2);
        assert_eq!(pivots[0].node, path[0]);
        assert_eq!(pivots[1].node, path[1]);
        assert_eq!(pivots[1].out_degree, 4);
        assert!(pivots.iter().all(|p| p.category == PIVOT_CATEGORY));
    }

    #[test]
    fn low_degree_nodes_are_skipped() {
        let (g, [n0, n1, n2, _, n4]) = grid_graph();
        assert!(find_pivots(&g, &[n0, n1, n2, n4]).is_empty());
    }
}

// ── Package ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod package {
    use aegis_core::Scenario;

    use super::helpers::{assert_close, grid_graph};
    use crate::{NarrativeBuilder, NavError};

    #[test]
    fn builds_consistent_package() {
        let (g, [n0, n1, n2, _, n4]) = grid_graph();
        let pkg = NarrativeBuilder::new(Scenario::Trauma)
            .build(&g, &[n0, n1, n2, n4], "baseline")
            .unwrap();

        assert_eq!(pkg.polyline.len(), pkg.cumulative_distance_m.len());
        assert_eq!(pkg.polyline.len(), pkg.cumulative_time_s.len());
        assert_eq!(pkg.algorithm, "baseline");
        assert_eq!(pkg.scenario, Scenario::Trauma);
        assert_eq!(pkg.steps.len(), 2);
        assert_close(pkg.total_distance_m(), g.path_length_m(&[n0, n1, n2, n4]).unwrap(), 1.0);
        assert!(pkg.total_time_s() > 0.0);

        assert_eq!(pkg.narrative.len(), pkg.steps.len() + 3);
        assert!(pkg.narrative[0].contains("trauma"));
        assert!(pkg.narrative[0].contains("baseline"));
        assert!(pkg.narrative[1].contains("km"));
        assert_eq!(pkg.narrative.last().map(String::as_str), Some("Arrive at destination"));
    }

    #[test]
    fn trivial_route() {
        let (g, [n0, ..]) = grid_graph();
        let pkg = NarrativeBuilder::default().build(&g, &[n0], "baseline").unwrap();
        assert_eq!(pkg.polyline.len(), 1);
        assert_eq!(pkg.total_distance_m(), 0.0);
        assert!(pkg.steps.is_empty());
    }

    #[test]
    fn all_or_nothing() {
        let (g, [n0, _, _, _, n4]) = grid_graph();
        let r = NarrativeBuilder::default().build(&g, &[n0, n4], "baseline");
        assert!(matches!(r, Err(NavError::MissingEdge { .. })));
    }
}
