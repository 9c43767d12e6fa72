//! `aegis-lookup` — free-text address lookup behind a process-wide throttle.
//!
//! The upstream gazetteer allows roughly one request per second for the
//! whole process.  [`LookupThrottle`] serializes every upstream call behind
//! one gate, spaces them by a minimum interval, and caches results by
//! normalized query so repeated or queued-up queries never reach upstream
//! twice.
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`address`]  | `AddressCandidate`, `AddressFields`                    |
//! | [`provider`] | `AddressProvider` trait, `StaticGazetteer`             |
//! | [`rank`]     | query normalization, region filter, autocomplete score |
//! | [`throttle`] | `LookupThrottle`                                       |

pub mod address;
pub mod error;
pub mod provider;
pub mod rank;
pub mod throttle;

#[cfg(test)]
mod tests;

pub use address::{AddressCandidate, AddressFields};
pub use error::{LookupError, LookupResult};
pub use provider::{AddressProvider, StaticGazetteer};
pub use rank::{matches_region, normalize_query, rank_candidates, score};
pub use throttle::{
    LookupThrottle, DEFAULT_AUTOCOMPLETE_LIMIT, DEFAULT_LOOKUP_CACHE_CAPACITY, DEFAULT_MIN_INTERVAL,
};
