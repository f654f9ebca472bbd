// Repository statistics.
// Snapshot type plus the aggregation that produces it.

pub mod aggregator;
pub mod metrics;
pub mod walk;

use serde::{Deserialize, Serialize};

pub use aggregator::StatsAggregator;
pub use metrics::CommitWindows;
pub use walk::TreeCounts;

/// Immutable statistics snapshot for one repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStats {
    /// File entries across the whole tree.
    pub total_files: u64,
    /// Directory entries across the whole tree.
    pub directories: u64,
    /// Language bytes / 1000, one decimal place. A size proxy, not a line count.
    pub lines_of_code: f64,
    pub contributors: u64,
    /// Commits authored in the trailing 7 days.
    pub weekly_commits: u64,
    /// Percent change against the 7 days before that; 0 when that week was empty.
    pub commit_percentage_change: i64,
}
