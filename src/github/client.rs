// GitHub API HTTP client.
// Handles per-request authentication, rate limit tracking, and response status mapping.

use std::sync::{Mutex, PoisonError};

use reqwest::{
    Client, ClientBuilder, Response, StatusCode, Url,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::debug;

use crate::config::Config;
use crate::error::{RepoStatsError, Result};
use crate::repo::Credential;

use super::types::RateLimit;

/// GitHub API client shared across callers. Credentials are supplied per request.
pub struct GitHubClient {
    client: Client,
    base: Url,
    rate_limit: Mutex<RateLimit>,
}

impl GitHubClient {
    /// Create a client from the API settings in `config`.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_client_builder(config, Client::builder())
    }

    /// Like [`GitHubClient::new`], starting from a caller-configured builder
    /// (proxies, TLS roots). Headers and timeout from `config` are applied on top.
    pub fn with_client_builder(config: &Config, builder: ClientBuilder) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_str(&config.api_version)
                .map_err(|e| RepoStatsError::Config(e.to_string()))?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| RepoStatsError::Config(e.to_string()))?,
        );

        let client = builder
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(RepoStatsError::Api)?;

        let base = Url::parse(&config.api_base)
            .map_err(|e| RepoStatsError::Config(format!("api_base: {}", e)))?;
        if base.cannot_be_a_base() {
            return Err(RepoStatsError::Config(format!(
                "api_base {} cannot be a base URL",
                config.api_base
            )));
        }

        Ok(Self {
            client,
            base,
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    /// Snapshot of the most recently observed rate limit.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Build an API URL from path segments. Each segment is percent-encoded.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments.iter().filter(|s| !s.is_empty()));
        }
        url
    }

    /// Make a GET request to the GitHub API.
    pub async fn get(&self, url: Url, credential: &Credential) -> Result<Response> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .bearer_auth(credential.expose())
            .send()
            .await
            .map_err(RepoStatsError::Api)?;

        self.finish(response).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        url: Url,
        params: &T,
        credential: &Credential,
    ) -> Result<Response> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .query(params)
            .bearer_auth(credential.expose())
            .send()
            .await
            .map_err(RepoStatsError::Api)?;

        self.finish(response).await
    }

    async fn finish(&self, response: Response) -> Result<Response> {
        let observed = ObservedRateLimit::from_headers(response.headers());
        self.update_rate_limit(&observed);
        check_response(response, &observed).await
    }

    /// Merge the headers seen on one response into the shared snapshot.
    fn update_rate_limit(&self, observed: &ObservedRateLimit) {
        let mut rate_limit = self
            .rate_limit
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(limit) = observed.limit {
            rate_limit.limit = limit;
        }
        if let Some(remaining) = observed.remaining {
            rate_limit.remaining = remaining;
        }
        if let Some(reset) = observed.reset {
            rate_limit.reset = reset;
        }
    }
}

/// Rate limit headers carried by a single response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ObservedRateLimit {
    limit: Option<u64>,
    remaining: Option<u64>,
    reset: Option<u64>,
}

impl ObservedRateLimit {
    fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| -> Option<u64> {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
        };

        Self {
            limit: header("x-ratelimit-limit"),
            remaining: header("x-ratelimit-remaining"),
            reset: header("x-ratelimit-reset"),
        }
    }

    fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    fn reset_at(&self) -> String {
        self.reset
            .and_then(|reset| chrono::DateTime::from_timestamp(reset as i64, 0))
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Check response status and convert errors. A 403 is a rate limit only when
/// this response itself reports no remaining requests.
async fn check_response(response: Response, observed: &ObservedRateLimit) -> Result<Response> {
    match response.status() {
        StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED | StatusCode::NO_CONTENT => {
            Ok(response)
        }
        StatusCode::UNAUTHORIZED => Err(RepoStatsError::Unauthorized),
        StatusCode::NOT_FOUND => {
            let url = response.url().to_string();
            Err(RepoStatsError::NotFound(url))
        }
        StatusCode::FORBIDDEN if observed.is_exhausted() => Err(RepoStatsError::RateLimited {
            reset_at: observed.reset_at(),
        }),
        StatusCode::FORBIDDEN => Err(RepoStatsError::Other(format!(
            "Forbidden: {}",
            response.text().await.unwrap_or_default()
        ))),
        status => Err(RepoStatsError::Other(format!(
            "HTTP {}: {}",
            status,
            response.text().await.unwrap_or_default()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::test_server::{Canned, CannedServer};

    fn client_with_base(base: &str) -> GitHubClient {
        let config = Config {
            api_base: base.to_string(),
            ..Config::default()
        };
        GitHubClient::new(&config).unwrap()
    }

    #[test]
    fn test_url_joins_segments() {
        let client = client_with_base("https://api.github.com");
        let url = client.url(&["repos", "phatblat", "jolt", "languages"]);
        assert_eq!(url.as_str(), "https://api.github.com/repos/phatblat/jolt/languages");
    }

    #[test]
    fn test_url_keeps_base_path_and_encodes() {
        let client = client_with_base("https://ghe.example.com/api/v3/");
        let url = client.url(&["repos", "o", "r", "contents", "docs", "a file#1.md"]);
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/o/r/contents/docs/a%20file%231.md"
        );
    }

    #[test]
    fn test_url_skips_empty_segments() {
        let client = client_with_base("https://api.github.com");
        let url = client.url(&["repos", "o", "r", "contents", ""]);
        assert_eq!(url.as_str(), "https://api.github.com/repos/o/r/contents");
    }

    #[test]
    fn test_rejects_invalid_base() {
        let config = Config {
            api_base: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            GitHubClient::new(&config),
            Err(RepoStatsError::Config(_))
        ));
    }

    #[test]
    fn test_initial_rate_limit_is_empty() {
        let client = client_with_base("https://api.github.com");
        let rate_limit = client.rate_limit();
        assert_eq!(rate_limit.limit, 0);
        assert_eq!(rate_limit.remaining, 0);
    }

    #[test]
    fn test_observed_rate_limit_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-limit", HeaderValue::from_static("5000"));
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        headers.insert("x-ratelimit-reset", HeaderValue::from_static("1700000000"));

        let observed = ObservedRateLimit::from_headers(&headers);
        assert_eq!(observed.limit, Some(5000));
        assert_eq!(observed.remaining, Some(0));
        assert!(observed.is_exhausted());
        assert_eq!(observed.reset_at(), "22:13:20");
    }

    #[test]
    fn test_missing_remaining_header_is_not_exhausted() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-limit", HeaderValue::from_static("5000"));

        let observed = ObservedRateLimit::from_headers(&headers);
        assert!(!observed.is_exhausted());
        assert_eq!(observed.reset_at(), "unknown");
    }

    #[tokio::test]
    async fn test_forbidden_uses_its_own_headers() {
        // An earlier response exhausted the shared snapshot; a plain 403 afterwards
        // must not be reported as a rate limit.
        let server = CannedServer::start(vec![
            (
                "/repos/o/limited",
                Canned::json(403, serde_json::json!({"message": "API rate limit exceeded"}))
                    .header("x-ratelimit-limit", "60")
                    .header("x-ratelimit-remaining", "0")
                    .header("x-ratelimit-reset", "1700000000"),
            ),
            (
                "/repos/o/private",
                Canned::json(403, serde_json::json!({"message": "Resource not accessible"})),
            ),
        ])
        .await;
        let client = server.client();
        let credential = Credential::new("ghp_token").unwrap();

        let limited = client
            .get(client.url(&["repos", "o", "limited"]), &credential)
            .await;
        assert!(matches!(
            limited,
            Err(RepoStatsError::RateLimited { ref reset_at }) if reset_at == "22:13:20"
        ));
        assert_eq!(client.rate_limit().remaining, 0);
        assert_eq!(client.rate_limit().limit, 60);

        let forbidden = client
            .get(client.url(&["repos", "o", "private"]), &credential)
            .await;
        match forbidden {
            Err(RepoStatsError::Other(message)) => {
                assert!(message.starts_with("Forbidden:"), "{message}");
                assert!(message.contains("Resource not accessible"));
            }
            other => panic!("expected Forbidden, got {:?}", other.map(|r| r.status())),
        }
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let server = CannedServer::start(vec![(
            "/user",
            Canned::json(401, serde_json::json!({"message": "Bad credentials"})),
        )])
        .await;
        let client = server.client();
        let credential = Credential::new("ghp_expired").unwrap();

        let unauthorized = client.get(client.url(&["user"]), &credential).await;
        assert!(matches!(unauthorized, Err(RepoStatsError::Unauthorized)));

        let missing = client
            .get(client.url(&["repos", "o", "gone"]), &credential)
            .await;
        match missing {
            Err(RepoStatsError::NotFound(url)) => assert!(url.ends_with("/repos/o/gone")),
            other => panic!("expected NotFound, got {:?}", other.map(|r| r.status())),
        }
    }
}
