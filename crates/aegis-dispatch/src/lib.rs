//! `aegis-dispatch` — the emergency routing service.
//!
//! Wires the lower crates into one request pipeline and exposes it through
//! [`RouteService`] (synchronous, plus a blocking-pool async wrapper) and
//! [`Dispatcher`] (routes and throttled address lookup together).
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`config`]  | `DispatchConfig` and its sections (JSON, all defaulted)    |
//! | [`request`] | `RouteRequest`, `RouteResponse`                            |
//! | [`service`] | `RouteService`, `Dispatcher`                               |
//! | [`builder`] | `RouteServiceBuilder`                                      |
//! | [`error`]   | `DispatchError`, `NavigationFault`, `DispatchResult<T>`    |
//!
//! # Error policy
//!
//! Strategy failures (external solver, precomputed tree) never surface:
//! they show up only as a fallback algorithm label on the response.
//! Anything that leaves no usable path is one [`NavigationFault`]; lookup
//! failures are reported separately as [`DispatchError::Lookup`].
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use aegis_dispatch::{DispatchConfig, RouteRequest, RouteServiceBuilder};
//! use aegis_spatial::ClippingProvider;
//!
//! let service = RouteServiceBuilder::new(ClippingProvider::new(region))
//!     .config(DispatchConfig::from_json_str(r#"{"landmark": {"lat": 43.8561, "lon": -79.337}}"#)?)
//!     .build()?;
//! let response = service.route(&RouteRequest::new(start, end).with_scenario("cardiac arrest"))?;
//! println!("{} via {}", response.total_distance_m, response.algorithm);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod request;
pub mod service;


pub use builder::RouteServiceBuilder;
pub use config::{ClosureConfig, CorridorConfig, DispatchConfig, LandmarkConfig, LookupConfig, SolverConfig};
pub use error::{DispatchError, DispatchResult, NavigationFault};
pub use request::{RouteRequest, RouteResponse};
pub use service::{Dispatcher, RouteService};
