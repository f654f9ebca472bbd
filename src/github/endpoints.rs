// GitHub API endpoint functions.
// Provides typed methods for the repository, statistics, and listing endpoints.

use std::collections::BTreeMap;

use reqwest::{Response, StatusCode};
use serde::{
    Deserialize,
    de::{DeserializeOwned, IgnoredAny},
};

use crate::error::{RepoStatsError, Result};
use crate::repo::{Credential, RepoRef};

use super::client::GitHubClient;
use super::types::{CommitSummary, ContentEntry, Contributor, Owner, Repository, SearchResponse};

/// Body of an endpoint expected to return a JSON array.
///
/// GitHub answers some list endpoints with an object instead (a single file
/// for a contents path, or a `{"message": ...}` error), which is kept apart
/// from a genuine listing.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    List(Vec<T>),
    Other(IgnoredAny),
}

/// Decode a JSON array body, rejecting anything else.
async fn decode_list<T: DeserializeOwned>(response: Response) -> Result<Vec<T>> {
    if response.status() == StatusCode::NO_CONTENT {
        return Ok(Vec::new());
    }

    let url = response.url().to_string();
    let body: ListBody<T> = response.json().await?;
    match body {
        ListBody::List(items) => Ok(items),
        ListBody::Other(_) => Err(RepoStatsError::UnexpectedResponse(url)),
    }
}

impl GitHubClient {
    /// Get the authenticated user.
    pub async fn get_current_user(&self, credential: &Credential) -> Result<Owner> {
        let response = self.get(self.url(&["user"]), credential).await?;
        let user: Owner = response.json().await?;
        Ok(user)
    }

    /// Get repositories accessible to the authenticated user, most recently updated first.
    pub async fn get_user_repos(
        &self,
        credential: &Credential,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Repository>> {
        let params = [
            ("sort", "updated"),
            ("direction", "desc"),
            ("page", &page.to_string()),
            ("per_page", &per_page.to_string()),
        ];
        let response = self
            .get_with_params(self.url(&["user", "repos"]), &params, credential)
            .await?;
        decode_list(response).await
    }

    /// Public repositories of any user, most starred first.
    pub async fn get_public_repos(
        &self,
        credential: &Credential,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Repository>> {
        let params = [
            ("sort", "stars"),
            ("per_page", &per_page.to_string()),
            ("page", &page.to_string()),
        ];
        let response = self
            .get_with_params(self.url(&["users", username, "repos"]), &params, credential)
            .await?;
        let mut repos: Vec<Repository> = decode_list(response).await?;

        // The listing API does not rank by stars itself.
        repos.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
        Ok(repos)
    }

    /// Search a user's repositories by name, most recently pushed first.
    pub async fn search_user_repos(
        &self,
        credential: &Credential,
        login: &str,
        query: &str,
        per_page: u32,
    ) -> Result<Vec<Repository>> {
        let q = format!("{} user:{}", query, login);
        let params = [("q", q.as_str()), ("per_page", &per_page.to_string())];
        let response = self
            .get_with_params(self.url(&["search", "repositories"]), &params, credential)
            .await?;
        let wrapper: SearchResponse<Repository> = response.json().await?;

        let mut items = wrapper.items;
        items.sort_by(|a, b| b.pushed_at.cmp(&a.pushed_at));
        Ok(items)
    }

    /// Get a specific repository. Fails with NotFound when it doesn't exist
    /// or the credential can't see it.
    pub async fn get_repo(&self, repo: &RepoRef, credential: &Credential) -> Result<Repository> {
        let response = self
            .get(self.url(&["repos", repo.owner(), repo.name()]), credential)
            .await?;
        let repository: Repository = response.json().await?;
        Ok(repository)
    }

    /// List contributors. An empty repository answers 204 and yields no contributors.
    pub async fn list_contributors(
        &self,
        repo: &RepoRef,
        credential: &Credential,
    ) -> Result<Vec<Contributor>> {
        let params = [("per_page", "100")];
        let response = self
            .get_with_params(
                self.url(&["repos", repo.owner(), repo.name(), "contributors"]),
                &params,
                credential,
            )
            .await?;
        decode_list(response).await
    }

    /// Bytes of code per language.
    pub async fn get_languages(
        &self,
        repo: &RepoRef,
        credential: &Credential,
    ) -> Result<BTreeMap<String, u64>> {
        let response = self
            .get(
                self.url(&["repos", repo.owner(), repo.name(), "languages"]),
                credential,
            )
            .await?;
        let languages: BTreeMap<String, u64> = response.json().await?;
        Ok(languages)
    }

    /// Most recent commits on the default branch, newest first.
    pub async fn list_commits(
        &self,
        repo: &RepoRef,
        credential: &Credential,
        per_page: u32,
    ) -> Result<Vec<CommitSummary>> {
        let params = [("per_page", per_page.to_string())];
        let response = self
            .get_with_params(
                self.url(&["repos", repo.owner(), repo.name(), "commits"]),
                &params,
                credential,
            )
            .await?;
        decode_list(response).await
    }

    /// List one directory. `path` is relative to the repository root; empty means the root.
    pub async fn list_contents(
        &self,
        repo: &RepoRef,
        path: &str,
        credential: &Credential,
    ) -> Result<Vec<ContentEntry>> {
        let mut segments = vec!["repos", repo.owner(), repo.name(), "contents"];
        segments.extend(path.split('/'));
        let response = self.get(self.url(&segments), credential).await?;
        decode_list(response).await
    }
}
