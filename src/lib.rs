// repostats: cached GitHub repository statistics.
// Aggregates file, language, contributor, and commit metrics per repository and
// memoizes the result for a fixed TTL.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod github;
pub mod host;
pub mod repo;
pub mod service;
pub mod stats;

pub use cache::TtlCache;
pub use config::Config;
pub use error::{RepoStatsError, Result};
pub use github::GitHubClient;
pub use host::RepoHost;
pub use repo::{Credential, RepoRef};
pub use service::RepoStatsService;
pub use stats::{RepoStats, StatsAggregator};
