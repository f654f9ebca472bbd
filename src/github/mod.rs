// GitHub API module.
// Provides client and types for interacting with the GitHub REST API.

pub mod client;
pub mod endpoints;
pub mod types;

#[cfg(test)]
pub(crate) mod test_server;

pub use client::GitHubClient;
pub use types::*;
