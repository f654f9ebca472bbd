// Runtime configuration.
// Loaded from an optional JSON file in the platform config directory, then
// overridden by REPOSTATS_* environment variables.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{RepoStatsError, Result};

/// GitHub caps `per_page` at 100.
pub const MAX_COMMIT_SAMPLE: u32 = 100;

/// Settings for the API client, cache, and aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the GitHub REST API.
    pub api_base: String,
    /// Value sent in the X-GitHub-Api-Version header.
    pub api_version: String,
    pub user_agent: String,
    /// How long a stats snapshot stays fresh.
    pub cache_ttl_secs: u64,
    /// Per-request timeout. A timed out call counts as a failed call.
    pub request_timeout_secs: u64,
    /// Maximum concurrent directory listings while walking a tree.
    pub walk_concurrency: usize,
    /// Number of recent commits sampled for the weekly delta.
    pub commit_sample_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            api_version: "2022-11-28".to_string(),
            user_agent: concat!("repostats/", env!("CARGO_PKG_VERSION")).to_string(),
            cache_ttl_secs: 60 * 60,
            request_timeout_secs: 10,
            walk_concurrency: 8,
            commit_sample_size: MAX_COMMIT_SAMPLE,
        }
    }
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match config_path() {
            Some(path) => Self::from_file(&path)?.unwrap_or_default(),
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file, returning None if it doesn't exist.
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(Some(config))
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup("REPOSTATS_API_BASE") {
            self.api_base = base;
        }
        if let Some(value) = lookup("REPOSTATS_CACHE_TTL_SECS") {
            self.cache_ttl_secs = parse_var("REPOSTATS_CACHE_TTL_SECS", &value)?;
        }
        if let Some(value) = lookup("REPOSTATS_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_var("REPOSTATS_REQUEST_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("REPOSTATS_WALK_CONCURRENCY") {
            self.walk_concurrency = parse_var("REPOSTATS_WALK_CONCURRENCY", &value)?;
        }
        if let Some(value) = lookup("REPOSTATS_COMMIT_SAMPLE_SIZE") {
            self.commit_sample_size = parse_var("REPOSTATS_COMMIT_SAMPLE_SIZE", &value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.walk_concurrency == 0 {
            return Err(RepoStatsError::Config(
                "walk_concurrency must be at least 1".to_string(),
            ));
        }
        if self.commit_sample_size == 0 || self.commit_sample_size > MAX_COMMIT_SAMPLE {
            return Err(RepoStatsError::Config(format!(
                "commit_sample_size must be between 1 and {}",
                MAX_COMMIT_SAMPLE
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(RepoStatsError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| RepoStatsError::Config(format!("{} has invalid value {:?}", name, value)))
}

/// Platform config directory (~/.config/repostats on Linux).
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "repostats").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path to the optional config file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}
