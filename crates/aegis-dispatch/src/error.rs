use thiserror::Error;

use aegis_lookup::LookupError;
use aegis_nav::NavError;
use aegis_routing::RoutingError;
use aegis_spatial::SpatialError;

/// Every way a route request can end without a usable path.
#[derive(Debug, Error)]
pub enum NavigationFault {
    #[error("road graph unavailable: {0}")]
    GraphUnavailable(String),

    #[error("no path found: {0}")]
    NoPathFound(String),

    #[error("could not snap {0} to the road graph")]
    EndpointSnapFailure(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<SpatialError> for NavigationFault {
    fn from(e: SpatialError) -> Self {
        NavigationFault::GraphUnavailable(e.to_string())
    }
}

impl From<RoutingError> for NavigationFault {
    fn from(e: RoutingError) -> Self {
        match e {
            RoutingError::EmptyCorridor => NavigationFault::GraphUnavailable(e.to_string()),
            other => NavigationFault::NoPathFound(other.to_string()),
        }
    }
}

impl From<NavError> for NavigationFault {
    fn from(e: NavError) -> Self {
        NavigationFault::NoPathFound(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("navigation fault: {0}")]
    Navigation(#[from] NavigationFault),

    #[error("address lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<SpatialError> for DispatchError {
    fn from(e: SpatialError) -> Self {
        DispatchError::Navigation(e.into())
    }
}

impl From<RoutingError> for DispatchError {
    fn from(e: RoutingError) -> Self {
        DispatchError::Navigation(e.into())
    }
}

impl From<NavError> for DispatchError {
    fn from(e: NavError) -> Self {
        DispatchError::Navigation(e.into())
    }
}

pub type DispatchResult<T> = Result<T, DispatchError>;
