// Error types for repostats.
// Covers GitHub API failures, configuration problems, and invalid caller input.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepoStatsError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("Missing GitHub token (pass --token or set GITHUB_TOKEN)")]
    MissingToken,

    #[error("Invalid repository identifier: {0}")]
    InvalidRepository(String),

    #[error("Unexpected response from {0}")]
    UnexpectedResponse(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, RepoStatsError>;
