//! Query normalization and autocomplete ranking.

use crate::AddressCandidate;

const BASE_SCORE: i32 = 100;
const HOUSE_NUMBER_MATCH: i32 = -50;
const HOUSE_NUMBER_MISMATCH: i32 = -10;
const ROAD_TOKEN_MATCH: i32 = -20;

/// Trim, lowercase, and collapse internal whitespace.  Used as the cache key.
pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `true` if any of the candidate's city/state/country/postcode contains
/// `region` (case-insensitive).  A blank region matches everything.
pub fn matches_region(candidate: &AddressCandidate, region: &str) -> bool {
    let region = region.trim().to_lowercase();
    region.is_empty()
        || candidate
            .address
            .region_components()
            .any(|c| c.to_lowercase().contains(&region))
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// Autocomplete score; lower is better.
///
/// Base 100.  If the query leads with a number, an exact house-number match
/// takes 50 off.  A candidate that has a house number but no exact match
/// takes 10 off.  Every other non-numeric query token found in the road
/// name takes 20 off.
pub fn score(query: &str, candidate: &AddressCandidate) -> i32 {
    let query = normalize_query(query);
    let mut tokens = query.split(' ').filter(|t| !t.is_empty()).peekable();
    let leading_number = tokens.next_if(|t| is_numeric(t));

    let mut score = BASE_SCORE;
    let house = candidate.address.house_number.as_deref().map(str::trim);
    match (leading_number, house) {
        (Some(n), Some(h)) if h.eq_ignore_ascii_case(n) => score += HOUSE_NUMBER_MATCH,
        (_, Some(h)) if !h.is_empty() => score += HOUSE_NUMBER_MISMATCH,
        _ => {}
    }

    let road = candidate
        .address
        .road
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    if !road.is_empty() {
        let hits = tokens.filter(|t| !is_numeric(t) && road.contains(*t)).count();
        score += ROAD_TOKEN_MATCH * hits as i32;
    }
    score
}

/// Filter by region, score, and keep the best `limit`, best first.
/// Ties keep upstream order.
pub fn rank_candidates(
    query: &str,
    candidates: Vec<AddressCandidate>,
    region: Option<&str>,
    limit: usize,
) -> Vec<AddressCandidate> {
    let mut scored: Vec<(i32, AddressCandidate)> = candidates
        .into_iter()
        .filter(|c| region.is_none_or(|r| matches_region(c, r)))
        .map(|c| (score(query, &c), c))
        .collect();
    scored.sort_by_key(|(s, _)| *s);
    scored.into_iter().take(limit).map(|(_, c)| c).collect()
}
