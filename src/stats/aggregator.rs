// Stats aggregator.
// Fans out the hosting API calls for one repository and folds them into a snapshot.

use std::sync::Arc;

use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{Config, MAX_COMMIT_SAMPLE};
use crate::error::Result;
use crate::host::RepoHost;
use crate::repo::{Credential, RepoRef};

use super::RepoStats;
use super::metrics::{commit_windows, lines_of_code, percentage_change};
use super::walk::walk_tree;

/// Computes [`RepoStats`] snapshots from a [`RepoHost`].
///
/// Never fails: each call that errors degrades its own metric to zero.
/// Only the newest `commit_sample_size` commits are sampled, so a busy
/// repository can under-count the previous week.
#[derive(Debug)]
pub struct StatsAggregator<H> {
    host: H,
    clock: Arc<dyn Clock>,
    walk_concurrency: usize,
    commit_sample_size: u32,
}

impl<H: RepoHost> StatsAggregator<H> {
    pub fn new(host: H, config: &Config) -> Self {
        Self::with_clock(host, config, Arc::new(SystemClock))
    }

    pub fn with_clock(host: H, config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            host,
            clock,
            walk_concurrency: config.walk_concurrency.max(1),
            commit_sample_size: config.commit_sample_size.clamp(1, MAX_COMMIT_SAMPLE),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Build a fresh snapshot for `repo`.
    pub async fn run(&self, repo: &RepoRef, credential: &Credential) -> RepoStats {
        let (contributors, languages, commits, tree) = tokio::join!(
            self.host.contributors(repo, credential),
            self.host.languages(repo, credential),
            self.host
                .recent_commits(repo, credential, self.commit_sample_size),
            walk_tree(&self.host, repo, credential, self.walk_concurrency),
        );

        let contributors = or_default(contributors, repo, "contributors");
        let languages = or_default(languages, repo, "languages");
        let commits = or_default(commits, repo, "commits");

        let windows = commit_windows(
            commits.iter().filter_map(|commit| commit.authored_at()),
            self.clock.now(),
        );

        let stats = RepoStats {
            total_files: tree.files,
            directories: tree.directories,
            lines_of_code: lines_of_code(&languages),
            contributors: contributors.len() as u64,
            weekly_commits: windows.this_week,
            commit_percentage_change: percentage_change(windows.this_week, windows.last_week),
        };

        info!(
            %repo,
            files = stats.total_files,
            directories = stats.directories,
            contributors = stats.contributors,
            weekly_commits = stats.weekly_commits,
            "aggregated repository stats"
        );
        stats
    }
}

/// Swap a failed call for its empty value.
fn or_default<T: Default>(result: Result<T>, repo: &RepoRef, metric: &str) -> T {
    result.unwrap_or_else(|e| {
        warn!(%repo, metric, error = %e, "stats call failed, using empty value");
        T::default()
    })
}
