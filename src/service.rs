// Stats service.
// The entry point page renders call: cache lookup, aggregation on miss, cache fill.

use std::sync::Arc;

use tracing::debug;

use crate::cache::TtlCache;
use crate::error::Result;
use crate::host::RepoHost;
use crate::repo::{Credential, RepoRef};
use crate::stats::{RepoStats, StatsAggregator};

/// Cached access to repository statistics.
///
/// Two concurrent misses for the same repository both aggregate; whichever
/// finishes last is what stays cached.
pub struct RepoStatsService<H> {
    aggregator: StatsAggregator<H>,
    cache: Arc<TtlCache<RepoStats>>,
}

impl<H: RepoHost> RepoStatsService<H> {
    pub fn new(aggregator: StatsAggregator<H>, cache: Arc<TtlCache<RepoStats>>) -> Self {
        Self { aggregator, cache }
    }

    pub fn cache(&self) -> &Arc<TtlCache<RepoStats>> {
        &self.cache
    }

    pub fn aggregator(&self) -> &StatsAggregator<H> {
        &self.aggregator
    }

    /// Stats for `owner/repo`, served from cache while fresh.
    ///
    /// Fails only on a missing credential or malformed identifiers, before
    /// anything is fetched. Hosting API failures show up as zeroed fields.
    pub async fn get_repo_stats(
        &self,
        owner: &str,
        repo: &str,
        credential: &str,
    ) -> Result<RepoStats> {
        let repo = RepoRef::new(owner, repo)?;
        let credential = Credential::new(credential)?;
        Ok(self.stats_for(&repo, &credential).await)
    }

    /// Same as [`get_repo_stats`](Self::get_repo_stats) for already validated input.
    pub async fn stats_for(&self, repo: &RepoRef, credential: &Credential) -> RepoStats {
        let key = repo.cache_key();

        if let Some(stats) = self.cache.get(&key) {
            debug!(key = %key, "stats cache hit");
            return stats;
        }

        debug!(key = %key, "stats cache miss");
        let stats = self.aggregator.run(repo, credential).await;
        self.cache.set(key, stats.clone());
        stats
    }

    /// Drop the cached snapshot so the next request recomputes it.
    pub fn refresh(&self, repo: &RepoRef) -> bool {
        self.cache.invalidate(&repo.cache_key())
    }
}
