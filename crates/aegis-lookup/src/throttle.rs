//! Process-wide gate in front of an [`AddressProvider`].
//!
//! ```text
//! caller ─► cache? ─► gate.lock().await ─► cache again? ─► sleep(deficit)
//!                                                           └► upstream ─► stamp ─► cache
//! ```
//!
//! The gate is held across the upstream call, so at most one call is ever
//! in flight and consecutive calls start at least `min_interval` apart.
//! Callers queued behind the gate re-check the cache once they get in: a
//! query that arrived twice reaches upstream once.

use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::provider::AddressProvider;
use crate::rank::{normalize_query, rank_candidates};
use crate::{AddressCandidate, LookupError, LookupResult};

pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1_100);
pub const DEFAULT_LOOKUP_CACHE_CAPACITY: usize = 200;
pub const DEFAULT_AUTOCOMPLETE_LIMIT: usize = 5;

/// Candidates requested from upstream before ranking trims to the limit.
const AUTOCOMPLETE_FETCH: usize = 10;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
enum QueryShape {
    Geocode,
    Autocomplete,
}

type CacheKey = (QueryShape, String);

pub struct LookupThrottle<P> {
    provider: P,
    /// Time the last upstream call finished; `None` before the first.
    gate: tokio::sync::Mutex<Option<Instant>>,
    cache: Mutex<FxHashMap<CacheKey, Vec<AddressCandidate>>>,
    min_interval: Duration,
    capacity: usize,
    region: Option<String>,
    limit: usize,
}

impl<P: AddressProvider> LookupThrottle<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            gate: tokio::sync::Mutex::new(None),
            cache: Mutex::new(FxHashMap::default()),
            min_interval: DEFAULT_MIN_INTERVAL,
            capacity: DEFAULT_LOOKUP_CACHE_CAPACITY,
            region: None,
            limit: DEFAULT_AUTOCOMPLETE_LIMIT,
        }
    }

    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Restrict autocomplete results to candidates whose address mentions
    /// `region` (city, state, country or postcode).
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Best single match for `query`, if any.
    pub async fn geocode(&self, query: &str) -> LookupResult<Option<AddressCandidate>> {
        let hits = self
            .lookup(QueryShape::Geocode, query, 1, |_, found| found)
            .await?;
        Ok(hits.into_iter().next())
    }

    /// Up to `limit` region-filtered candidates, best first.
    pub async fn autocomplete(&self, query: &str) -> LookupResult<Vec<AddressCandidate>> {
        let region = self.region.as_deref();
        let limit = self.limit;
        self.lookup(QueryShape::Autocomplete, query, AUTOCOMPLETE_FETCH, |q, found| {
            rank_candidates(q, found, region, limit)
        })
        .await
    }

    async fn lookup<F>(
        &self,
        shape: QueryShape,
        query: &str,
        fetch: usize,
        finish: F,
    ) -> LookupResult<Vec<AddressCandidate>>
    where
        F: FnOnce(&str, Vec<AddressCandidate>) -> Vec<AddressCandidate>,
    {
        let normalized = normalize_query(query);
        if normalized.is_empty() {
            return Err(LookupError::EmptyQuery);
        }
        let key = (shape, normalized);

        if let Some(hit) = self.cached(&key) {
            debug!(query = %key.1, "lookup cache hit");
            return Ok(hit);
        }

        let mut last_call = self.gate.lock().await;

        if let Some(hit) = self.cached(&key) {
            debug!(query = %key.1, "lookup cache hit after waiting for gate");
            return Ok(hit);
        }

        if let Some(prev) = *last_call {
            let deficit = self.min_interval.saturating_sub(prev.elapsed());
            if !deficit.is_zero() {
                sleep(deficit).await;
            }
        }

        let region = match shape {
            QueryShape::Autocomplete => self.region.as_deref(),
            QueryShape::Geocode => None,
        };
        let outcome = self.provider.search(&key.1, region, fetch).await;
        *last_call = Some(Instant::now());

        // Store before releasing the gate so queued duplicates see the entry.
        let found = outcome.inspect_err(|e| warn!(query = %key.1, error = %e, "address lookup failed"))?;
        let result = finish(&key.1, found);
        self.store(key, result.clone());
        drop(last_call);
        Ok(result)
    }

    fn cached(&self, key: &CacheKey) -> Option<Vec<AddressCandidate>> {
        self.cache.lock().get(key).cloned()
    }

    fn store(&self, key: CacheKey, value: Vec<AddressCandidate>) {
        let mut cache = self.cache.lock();
        if cache.len() >= self.capacity {
            debug!(entries = cache.len(), "lookup cache full, clearing");
            cache.clear();
        }
        cache.insert(key, value);
    }
}
