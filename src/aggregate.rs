//! Merge, validate and deduplicate the candidates of every strategy.

use std::collections::BTreeSet;

use tracing::{debug, info};
use url::Url;

use crate::config::ScraperConfig;
use crate::extractors::Strategy;
use crate::fetch::RawPage;

/// Outcome of running the full cascade over one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Validated, unique, ascending
    pub images: Vec<String>,
    /// Candidates pooled before filtering, duplicates included
    pub raw_candidates: usize,
}

/// Run every strategy over `page` and reduce the pooled candidates to the
/// final image list.
pub fn aggregate(page: &RawPage, config: &ScraperConfig) -> Aggregation {
    let mut pool: Vec<(Strategy, String)> = Vec::new();

    for strategy in Strategy::CASCADE {
        let found = strategy.extract(page, config);
        info!(strategy = strategy.name(), count = found.len(), "strategy finished");
        pool.extend(found.into_iter().map(|url| (strategy, url)));
    }

    let raw_candidates = pool.len();
    let images = merge_candidates(pool, &config.signature);

    Aggregation {
        images,
        raw_candidates,
    }
}

/// Filter, validate, dedupe and sort pooled `(strategy, url)` candidates.
pub fn merge_candidates(pool: Vec<(Strategy, String)>, signature: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();

    for (strategy, candidate) in pool {
        let candidate = candidate.trim();
        if candidate.is_empty() || !candidate.contains(signature) {
            continue;
        }
        if seen.iter().any(|s| s == candidate) {
            continue;
        }
        if !is_valid_url(candidate) {
            debug!(candidate, "dropping invalid URL");
            continue;
        }
        debug!(via = %strategy, url = candidate, "found image");
        seen.push(candidate.to_string());
    }

    let unique: BTreeSet<String> = seen.into_iter().collect();
    unique.into_iter().collect()
}

/// Scheme, authority and path must all decompose.
fn is_valid_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => !url.cannot_be_a_base() && url.has_host(),
        Err(_) => false,
    }
}
