//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they need to.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("coordinate ({lat}, {lon}) is outside the valid WGS-84 range")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

pub type CoreResult<T> = Result<T, CoreError>;
