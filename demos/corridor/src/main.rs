//! corridor — end-to-end walk through the aegis routing pipeline.
//!
//! Builds a synthetic Markham network, serves it through a clipping
//! provider, geocodes two addresses through the throttled gazetteer, then
//! routes the same trip with every strategy, with a road closure, and once
//! more with an exploration trace.  The final response is printed as JSON.
//!
//! ```text
//! cargo run -p corridor                 # built-in configuration
//! cargo run -p corridor -- aegis.json   # DispatchConfig from a file
//! RUST_LOG=debug cargo run -p corridor  # cache hits, fallbacks, tree builds
//! ```

mod network;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use aegis_dispatch::{DispatchConfig, Dispatcher, RouteRequest, RouteResponse, RouteServiceBuilder};
use aegis_spatial::ClippingProvider;

use network::{build_network, gazetteer, HOSPITAL};

fn default_config() -> String {
    format!(
        r#"{{
            "landmark": {{ "lat": {}, "lon": {}, "tolerance_m": 75.0 }},
            "lookup":   {{ "region": "Ontario" }}
        }}"#,
        HOSPITAL.lat, HOSPITAL.lon
    )
}

fn summarize(label: &str, r: &RouteResponse) {
    println!(
        "{label:<14} {:>7.0} m  {:>5.0} s  {:>2} steps  {:>2} pivots  via {}",
        r.total_distance_m,
        r.total_time_s,
        r.steps.len(),
        r.pivots.len(),
        r.algorithm
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    println!("=== corridor — aegis emergency routing ===");

    // 1. Configuration.
    let config = match std::env::args().nth(1) {
        Some(path) => DispatchConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => DispatchConfig::from_json_str(&default_config())?,
    };

    // 2. Regional graph, served corridor by corridor.
    let (region, _nodes) = build_network();
    println!("Region: {} nodes, {} edges", region.node_count(), region.edge_count());
    let provider = ClippingProvider::new(Arc::new(region));

    // 3. Service and lookup.
    let routes = RouteServiceBuilder::new(provider).config(config.clone()).build()?;
    let dispatcher = Dispatcher::new(routes, config.lookup.throttle(gazetteer()));

    // 4. Geocode the call and the hospital (second call waits out the throttle).
    let origin = dispatcher
        .geocode("3601 Highway 7")
        .await?
        .context("origin address not found")?;
    let hospital = dispatcher
        .autocomplete("381 Church")
        .await?
        .into_iter()
        .next()
        .context("hospital address not found")?;
    println!("From: {}", origin.display_name);
    println!("To:   {}", hospital.display_name);
    println!();

    // 5. Same trip with every strategy.
    let trip = || RouteRequest::new(origin.point, hospital.point).with_scenario("cardiac arrest");
    for strategy in ["baseline", "traced", "experimental", "precomputed"] {
        let resp = dispatcher.route(trip().with_strategy(strategy)).await?;
        summarize(strategy, &resp);
    }

    // 6. Highway 7 closed at McCowan.
    let closed = dispatcher
        .route(trip().with_closure(aegis_core::GeoPoint::new(43.8690, -79.2780)))
        .await?;
    summarize("closure", &closed);

    // 7. Traced run, printed in full.
    let traced = dispatcher.route(trip().with_trace(true)).await?;
    summarize("trace", &traced);
    println!();
    for line in &traced.narrative {
        println!("  {line}");
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&traced)?);

    tracing::info!(
        corridors = dispatcher.routes().corridors().len(),
        lookups_cached = dispatcher.lookup().cached_len(),
        "done"
    );
    Ok(())
}
