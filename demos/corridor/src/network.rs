//! Synthetic Markham, ON road network and gazetteer.
//!
//! Seven intersections along Highway 7 and 16th Avenue, ending at the
//! regional hospital on Church Street.  Coordinates are approximate.

use aegis_core::{GeoPoint, NodeId};
use aegis_lookup::{AddressCandidate, StaticGazetteer};
use aegis_spatial::{EdgeAttrs, RoadGraph, RoadGraphBuilder};

pub const HOSPITAL: GeoPoint = GeoPoint { lat: 43.8830, lon: -79.2310 };

fn road(name: &str, highway: &str) -> EdgeAttrs {
    EdgeAttrs::default().with_name(name).with_highway(highway)
}

/// Returns `(graph, [warden_hwy7, kennedy_hwy7, mccowan_hwy7, main_hwy7,
/// kennedy_16th, main_16th, hospital])`.
pub fn build_network() -> (RoadGraph, [NodeId; 7]) {
    let mut b = RoadGraphBuilder::new();

    let warden_hwy7  = b.add_node(GeoPoint::new(43.8560, -79.3370));
    let kennedy_hwy7 = b.add_node(GeoPoint::new(43.8620, -79.3060));
    let mccowan_hwy7 = b.add_node(GeoPoint::new(43.8690, -79.2780));
    let main_hwy7    = b.add_node(GeoPoint::new(43.8750, -79.2580));
    let kennedy_16th = b.add_node(GeoPoint::new(43.8770, -79.3130));
    let main_16th    = b.add_node(GeoPoint::new(43.8880, -79.2640));
    let hospital     = b.add_node(HOSPITAL);

    let hwy7 = || road("Highway 7", "primary").with_ref("YR 7").with_maxspeed("60");
    b.add_straight_road(warden_hwy7, kennedy_hwy7, hwy7());
    b.add_straight_road(kennedy_hwy7, mccowan_hwy7, hwy7());
    b.add_straight_road(mccowan_hwy7, main_hwy7, hwy7());

    b.add_straight_road(kennedy_hwy7, kennedy_16th, road("Kennedy Road", "secondary").with_maxspeed("50"));
    b.add_straight_road(kennedy_16th, main_16th, road("16th Avenue", "secondary").with_maxspeed("60"));
    b.add_straight_road(main_hwy7, main_16th, road("Main Street Markham", "tertiary"));

    // McCowan is one-way northbound through the works zone.
    let mccowan_len = b.node_pos(mccowan_hwy7).distance_m(b.node_pos(main_16th));
    b.add_directed_edge(mccowan_hwy7, main_16th, mccowan_len, road("McCowan Road", "secondary"));

    // Church Street bends north of the rail line.
    let church = vec![
        b.node_pos(main_hwy7),
        GeoPoint::new(43.8790, -79.2480),
        GeoPoint::new(43.8815, -79.2400),
        HOSPITAL,
    ];
    let church_len = church.windows(2).map(|w| w[0].distance_m(w[1])).sum();
    b.add_road(main_hwy7, hospital, church_len, road("Church Street", "secondary").with_geometry(church));

    b.add_straight_road(main_16th, hospital, road("Hospital Access", "service"));

    let net = b.build();
    (net, [warden_hwy7, kennedy_hwy7, mccowan_hwy7, main_hwy7, kennedy_16th, main_16th, hospital])
}

pub fn gazetteer() -> StaticGazetteer {
    let markham = |point, name: &str, number: &str, street: &str| {
        AddressCandidate::new(point, format!("{name}, Markham, Ontario"))
            .with_house_number(number)
            .with_road(street)
            .with_city("Markham")
            .with_state("Ontario")
            .with_country("Canada")
    };
    StaticGazetteer::new(vec![
        markham(HOSPITAL, "Markham Stouffville Hospital, 381 Church Street", "381", "Church Street"),
        markham(GeoPoint::new(43.8562, -79.3365), "3601 Highway 7", "3601", "Highway 7"),
        markham(GeoPoint::new(43.8772, -79.3125), "7750 Kennedy Road", "7750", "Kennedy Road"),
        markham(GeoPoint::new(43.8879, -79.2645), "6060 16th Avenue", "6060", "16th Avenue"),
    ])
}
