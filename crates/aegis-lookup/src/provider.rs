//! Upstream address providers.

use std::future::Future;
use std::sync::Arc;

use crate::rank::{matches_region, normalize_query};
use crate::{AddressCandidate, LookupResult};

/// A free-text gazetteer.
///
/// Implementations are called at most once at a time per
/// [`LookupThrottle`](crate::LookupThrottle) and need not rate-limit
/// themselves.
pub trait AddressProvider: Send + Sync {
    fn search(
        &self,
        query: &str,
        region: Option<&str>,
        limit: usize,
    ) -> impl Future<Output = LookupResult<Vec<AddressCandidate>>> + Send;
}

impl<P: AddressProvider> AddressProvider for Arc<P> {
    fn search(
        &self,
        query: &str,
        region: Option<&str>,
        limit: usize,
    ) -> impl Future<Output = LookupResult<Vec<AddressCandidate>>> + Send {
        (**self).search(query, region, limit)
    }
}

/// In-memory gazetteer: a candidate matches when every query token appears
/// in its display name (case-insensitive).
#[derive(Clone, Debug, Default)]
pub struct StaticGazetteer {
    entries: Vec<AddressCandidate>,
}

impl StaticGazetteer {
    pub fn new(entries: Vec<AddressCandidate>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, query: &str, region: Option<&str>, limit: usize) -> Vec<AddressCandidate> {
        let query = normalize_query(query);
        let tokens: Vec<&str> = query.split(' ').filter(|t| !t.is_empty()).collect();
        self.entries
            .iter()
            .filter(|c| {
                let name = c.display_name.to_lowercase();
                tokens.iter().all(|t| name.contains(t))
            })
            .filter(|c| region.is_none_or(|r| matches_region(c, r)))
            .take(limit)
            .cloned()
            .collect()
    }
}

impl AddressProvider for StaticGazetteer {
    async fn search(
        &self,
        query: &str,
        region: Option<&str>,
        limit: usize,
    ) -> LookupResult<Vec<AddressCandidate>> {
        Ok(self.lookup(query, region, limit))
    }
}
