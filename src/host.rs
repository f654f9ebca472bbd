// Hosting API abstraction.
// The aggregator only sees this trait; GitHubClient is the production implementation.

use std::collections::BTreeMap;
use std::future::Future;

use crate::error::Result;
use crate::github::{CommitSummary, ContentEntry, Contributor, GitHubClient};
use crate::repo::{Credential, RepoRef};

/// Calls the stats aggregator makes against a repository host.
pub trait RepoHost: Send + Sync {
    fn contributors(
        &self,
        repo: &RepoRef,
        credential: &Credential,
    ) -> impl Future<Output = Result<Vec<Contributor>>> + Send;

    fn languages(
        &self,
        repo: &RepoRef,
        credential: &Credential,
    ) -> impl Future<Output = Result<BTreeMap<String, u64>>> + Send;

    /// Up to `limit` most recent commits, newest first.
    fn recent_commits(
        &self,
        repo: &RepoRef,
        credential: &Credential,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<CommitSummary>>> + Send;

    /// Entries directly under `path` (empty for the root).
    fn directory(
        &self,
        repo: &RepoRef,
        path: &str,
        credential: &Credential,
    ) -> impl Future<Output = Result<Vec<ContentEntry>>> + Send;
}

impl RepoHost for GitHubClient {
    async fn contributors(
        &self,
        repo: &RepoRef,
        credential: &Credential,
    ) -> Result<Vec<Contributor>> {
        self.list_contributors(repo, credential).await
    }

    async fn languages(
        &self,
        repo: &RepoRef,
        credential: &Credential,
    ) -> Result<BTreeMap<String, u64>> {
        self.get_languages(repo, credential).await
    }

    async fn recent_commits(
        &self,
        repo: &RepoRef,
        credential: &Credential,
        limit: u32,
    ) -> Result<Vec<CommitSummary>> {
        self.list_commits(repo, credential, limit).await
    }

    async fn directory(
        &self,
        repo: &RepoRef,
        path: &str,
        credential: &Credential,
    ) -> Result<Vec<ContentEntry>> {
        self.list_contents(repo, path, credential).await
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{DateTime, Utc};

    use super::RepoHost;
    use crate::error::{RepoStatsError, Result};
    use crate::github::{
        CommitDetail, CommitSummary, ContentEntry, ContentKind, Contributor, GitActor,
    };
    use crate::repo::{Credential, RepoRef};

    /// In-memory host. A `None` field makes that call fail.
    #[derive(Debug, Default)]
    pub struct FakeHost {
        pub contributors: Option<Vec<Contributor>>,
        pub languages: Option<BTreeMap<String, u64>>,
        pub commits: Option<Vec<CommitSummary>>,
        pub tree: HashMap<String, Option<Vec<ContentEntry>>>,
        pub calls: AtomicUsize,
    }

    impl FakeHost {
        /// A host whose calls all succeed with empty results.
        pub fn empty() -> Self {
            Self {
                contributors: Some(Vec::new()),
                languages: Some(BTreeMap::new()),
                commits: Some(Vec::new()),
                tree: HashMap::from([(String::new(), Some(Vec::new()))]),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with_dir(mut self, path: &str, entries: Vec<ContentEntry>) -> Self {
            self.tree.insert(path.to_string(), Some(entries));
            self
        }

        pub fn with_broken_dir(mut self, path: &str) -> Self {
            self.tree.insert(path.to_string(), None);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn answer<T: Clone>(&self, value: &Option<T>) -> Result<T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            value
                .clone()
                .ok_or_else(|| RepoStatsError::Other("simulated failure".to_string()))
        }
    }

    impl RepoHost for FakeHost {
        async fn contributors(&self, _: &RepoRef, _: &Credential) -> Result<Vec<Contributor>> {
            self.answer(&self.contributors)
        }

        async fn languages(&self, _: &RepoRef, _: &Credential) -> Result<BTreeMap<String, u64>> {
            self.answer(&self.languages)
        }

        async fn recent_commits(
            &self,
            _: &RepoRef,
            _: &Credential,
            limit: u32,
        ) -> Result<Vec<CommitSummary>> {
            self.answer(&self.commits)
                .map(|commits| commits.into_iter().take(limit as usize).collect())
        }

        async fn directory(
            &self,
            _: &RepoRef,
            path: &str,
            _: &Credential,
        ) -> Result<Vec<ContentEntry>> {
            match self.tree.get(path) {
                Some(listing) => self.answer(listing),
                None => self.answer(&None),
            }
        }
    }

    pub fn file(path: &str) -> ContentEntry {
        entry(path, ContentKind::File)
    }

    pub fn dir(path: &str) -> ContentEntry {
        entry(path, ContentKind::Dir)
    }

    pub fn entry(path: &str, kind: ContentKind) -> ContentEntry {
        ContentEntry {
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            kind,
            size: 0,
        }
    }

    pub fn contributor(login: &str) -> Contributor {
        Contributor {
            login: Some(login.to_string()),
            contributions: 1,
        }
    }

    pub fn commit_at(date: DateTime<Utc>) -> CommitSummary {
        CommitSummary {
            sha: format!("{:x}", date.timestamp()),
            commit: CommitDetail {
                message: "change".to_string(),
                author: Some(GitActor {
                    name: Some("dev".to_string()),
                    date: Some(date),
                }),
            },
            html_url: None,
        }
    }
}
