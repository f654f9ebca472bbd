// Repository identifiers and API credentials.
// Validates caller input before any network or cache work happens.

use std::fmt;
use std::str::FromStr;

use crate::error::{RepoStatsError, Result};

/// An `owner/name` pair identifying a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    owner: String,
    name: String,
}

impl RepoRef {
    /// Build a reference, rejecting empty or slash-containing parts.
    pub fn new(owner: &str, name: &str) -> Result<Self> {
        let owner = owner.trim();
        let name = name.trim();

        for part in [owner, name] {
            if part.is_empty() || part.contains('/') {
                return Err(RepoStatsError::InvalidRepository(format!("{}/{}", owner, name)));
            }
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cache key for this repository. GitHub names are case-insensitive.
    pub fn cache_key(&self) -> String {
        format!(
            "{}/{}",
            self.owner.to_lowercase(),
            self.name.to_lowercase()
        )
    }
}

impl FromStr for RepoRef {
    type Err = RepoStatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().split_once('/') {
            Some((owner, name)) => Self::new(owner, name),
            None => Err(RepoStatsError::InvalidRepository(s.to_string())),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Opaque bearer token passed through to the hosting API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: &str) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(RepoStatsError::MissingToken);
        }
        Ok(Self(token.to_string()))
    }

    /// Read the credential from the GITHUB_TOKEN environment variable.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GITHUB_TOKEN").map_err(|_| RepoStatsError::MissingToken)?;
        Self::new(&token)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
