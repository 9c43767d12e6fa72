//! Unit tests for aegis-lookup.
//!
//! Throttle tests run on a paused tokio clock, so the 1.1 s spacing is
//! checked exactly and without real waiting.

#[cfg(test)]
pub(crate) mod helpers {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use parking_lot::Mutex;
    use tokio::time::{sleep, Instant};

    use aegis_core::GeoPoint;

    use crate::{AddressCandidate, AddressProvider, LookupError, LookupResult};

    pub fn markham_main() -> AddressCandidate {
        AddressCandidate::new(GeoPoint::new(43.8561, -79.3370), "123 Main Street, Markham, Ontario")
            .with_house_number("123")
            .with_road("Main Street")
            .with_city("Markham")
            .with_state("Ontario")
            .with_country("Canada")
    }

    pub fn markham_main_no_number() -> AddressCandidate {
        AddressCandidate::new(GeoPoint::new(43.8570, -79.3380), "Main Street, Markham, Ontario")
            .with_road("Main Street")
            .with_city("Markham")
            .with_state("Ontario")
            .with_country("Canada")
    }

    pub fn markham_main_other_number() -> AddressCandidate {
        AddressCandidate::new(GeoPoint::new(43.8580, -79.3390), "125 Main Street, Markham, Ontario")
            .with_house_number("125")
            .with_road("Main Street")
            .with_city("Markham")
            .with_state("Ontario")
            .with_country("Canada")
    }

    pub fn buffalo_main() -> AddressCandidate {
        AddressCandidate::new(GeoPoint::new(42.8864, -78.8784), "123 Main Street, Buffalo, New York")
            .with_house_number("123")
            .with_road("Main Street")
            .with_city("Buffalo")
            .with_state("New York")
            .with_country("United States")
    }

    /// Returns its fixed candidate list for every query and records when
    /// each call started.
    pub struct Scripted {
        pub entries: Vec<AddressCandidate>,
        pub latency: Duration,
        pub failures_left: AtomicUsize,
        pub calls: Mutex<Vec<(Instant, String)>>,
    }

    impl Scripted {
        pub fn new(entries: Vec<AddressCandidate>) -> Self {
            Self {
                entries,
                latency: Duration::from_millis(50),
                failures_left: AtomicUsize::new(0),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing_first(self, n: usize) -> Self {
            self.failures_left.store(n, Ordering::SeqCst);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().len()
        }

        pub fn call_times(&self) -> Vec<Instant> {
            let mut t: Vec<Instant> = self.calls.lock().iter().map(|(t, _)| *t).collect();
            t.sort();
            t
        }
    }

    impl AddressProvider for Scripted {
        async fn search(
            &self,
            query: &str,
            _region: Option<&str>,
            limit: usize,
        ) -> LookupResult<Vec<AddressCandidate>> {
            self.calls.lock().push((Instant::now(), query.to_string()));
            sleep(self.latency).await;
            let failing = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failing {
                return Err(LookupError::Upstream("503 Service Unavailable".into()));
            }
            Ok(self.entries.iter().take(limit).cloned().collect())
        }
    }
}

// ── Ranking ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ranking {
    use super::helpers::*;
    use crate::{matches_region, normalize_query, rank_candidates, score};

    #[test]
    fn normalization() {
        assert_eq!(normalize_query("  123   MAIN\tSt "), "123 main st");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn house_number_and_road_tokens() {
        assert_eq!(score("123 Main", &markham_main()), 30);
        assert_eq!(score("123 Main", &markham_main_other_number()), 70);
        assert_eq!(score("123 Main", &markham_main_no_number()), 80);
        assert!(score("123 Main", &markham_main()) < score("123 Main", &markham_main_no_number()));
    }

    #[test]
    fn numeric_token_only_counts_when_leading() {
        // "main 123": no leading number; "123" is numeric so it never scores.
        assert_eq!(score("main 123", &markham_main_no_number()), 80);
        assert_eq!(score("main 123", &markham_main()), 70);
    }

    #[test]
    fn region_matches_any_component() {
        assert!(matches_region(&markham_main(), "ontario"));
        assert!(matches_region(&markham_main(), "Markham"));
        assert!(!matches_region(&buffalo_main(), "Ontario"));
        assert!(matches_region(&buffalo_main(), ""));
    }

    #[test]
    fn rank_filters_sorts_and_truncates() {
        let all = vec![
            markham_main_no_number(),
            buffalo_main(),
            markham_main_other_number(),
            markham_main(),
        ];
        let ranked = rank_candidates("123 Main", all, Some("Ontario"), 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0], markham_main());
        assert_eq!(ranked[1], markham_main_other_number());
    }
}

// ── Gazetteer ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod gazetteer {
    use super::helpers::*;
    use crate::{AddressProvider, StaticGazetteer};

    #[tokio::test]
    async fn token_match_and_region() {
        let g = StaticGazetteer::new(vec![markham_main(), buffalo_main(), markham_main_no_number()]);
        let hits = g.search("123 main", None, 10).await.unwrap();
        assert_eq!(hits.len(), 2);

        let hits = g.search("123 main", Some("ontario"), 10).await.unwrap();
        assert_eq!(hits, vec![markham_main()]);

        let hits = g.search("main", None, 1).await.unwrap();
        assert_eq!(hits.len(), 1);
    }
}

// ── Throttle ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod throttle {
    use std::sync::Arc;
    use std::time::Duration;

    use super::helpers::*;
    use crate::{LookupError, LookupThrottle, DEFAULT_MIN_INTERVAL};

    fn throttle() -> Arc<LookupThrottle<Scripted>> {
        Arc::new(LookupThrottle::new(Scripted::new(vec![
            markham_main_no_number(),
            buffalo_main(),
            markham_main(),
        ])))
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_are_spaced() {
        let t = throttle();
        let mut handles = Vec::new();
        for (i, q) in ["main", "oak", "elm", "ridge", "birch"].into_iter().enumerate() {
            let t = Arc::clone(&t);
            handles.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    t.geocode(q).await.map(|_| ())
                } else {
                    t.autocomplete(q).await.map(|_| ())
                }
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let times = t.provider().call_times();
        assert_eq!(times.len(), 5);
        for pair in times.windows(2) {
            assert!(
                pair[1] - pair[0] >= DEFAULT_MIN_INTERVAL,
                "calls {:?} apart",
                pair[1] - pair[0]
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn queued_duplicates_hit_cache() {
        let t = throttle();
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let t = Arc::clone(&t);
                tokio::spawn(async move { t.geocode("  123 MAIN ").await })
            })
            .collect();
        for h in handles {
            assert!(h.await.unwrap().unwrap().is_some());
        }
        assert_eq!(t.provider().call_count(), 1);

        // Differently spelled, same normalized query.
        t.geocode("123 main").await.unwrap();
        assert_eq!(t.provider().call_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn queued_duplicates_hit_cache_across_workers() {
        let t = Arc::new(
            LookupThrottle::new(Scripted::new(vec![markham_main(), buffalo_main()]))
                .with_min_interval(Duration::from_millis(10)),
        );
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let t = Arc::clone(&t);
                tokio::spawn(async move { t.autocomplete("123 main").await })
            })
            .collect();
        for h in handles {
            assert_eq!(h.await.unwrap().unwrap().len(), 2);
        }
        assert_eq!(t.provider().call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn geocode_and_autocomplete_cache_separately() {
        let t = throttle();
        t.geocode("123 main").await.unwrap();
        t.autocomplete("123 main").await.unwrap();
        assert_eq!(t.provider().call_count(), 2);
        assert_eq!(t.cached_len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn autocomplete_ranks_within_region() {
        let t = Arc::new(
            LookupThrottle::new(Scripted::new(vec![
                markham_main_no_number(),
                buffalo_main(),
                markham_main(),
            ]))
            .with_region("Ontario")
            .with_limit(5),
        );
        let hits = t.autocomplete("123 Main").await.unwrap();
        assert_eq!(hits, vec![markham_main(), markham_main_no_number()]);
    }

    #[tokio::test(start_paused = true)]
    async fn overflow_clears_whole_cache() {
        let t = LookupThrottle::new(Scripted::new(vec![markham_main()]))
            .with_cache_capacity(2)
            .with_min_interval(Duration::from_millis(10));
        t.geocode("a").await.unwrap();
        t.geocode("b").await.unwrap();
        assert_eq!(t.cached_len(), 2);
        t.geocode("c").await.unwrap();
        assert_eq!(t.cached_len(), 1);

        // "a" was dropped with the rest.
        t.geocode("a").await.unwrap();
        assert_eq!(t.provider().call_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_surface_and_are_not_cached() {
        let t = LookupThrottle::new(Scripted::new(vec![markham_main()]).failing_first(1));
        let err = t.geocode("123 main").await.unwrap_err();
        assert!(matches!(err, LookupError::Upstream(_)));
        assert_eq!(t.cached_len(), 0);

        let hit = t.geocode("123 main").await.unwrap();
        assert_eq!(hit, Some(markham_main()));
        assert_eq!(t.provider().call_count(), 2);

        let times = t.provider().call_times();
        assert!(times[1] - times[0] >= DEFAULT_MIN_INTERVAL);
    }

    #[tokio::test]
    async fn empty_query_never_reaches_upstream() {
        let t = throttle();
        assert_eq!(t.geocode("   ").await.unwrap_err(), LookupError::EmptyQuery);
        assert_eq!(t.autocomplete("").await.unwrap_err(), LookupError::EmptyQuery);
        assert_eq!(t.provider().call_count(), 0);
    }
}
