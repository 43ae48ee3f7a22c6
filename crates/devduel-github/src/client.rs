//! HTTP client for the GitHub REST API.
//!
//! Wraps `reqwest` with GitHub-specific error handling, optional token auth,
//! and typed response deserialization. A not-found user surfaces as
//! `Ok(None)`, never as an error — a missing subject is a normal outcome for
//! the comparison pipeline, not a fault.

use std::time::Duration;

use reqwest::{header, Client, StatusCode, Url};

use crate::error::GithubError;
use crate::retry::retry_with_backoff;
use crate::types::{empty_to_none, Profile, RepoResponse, TopRepo, UserResponse, TOP_REPO_LIMIT};

const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// How many repositories to request per page. One page is enough: ranking
/// only needs a large-enough sample to pick the top five by stars.
const REPOS_PER_PAGE: u32 = 100;

/// Client for the GitHub REST API.
///
/// Use [`GithubClient::new`] for production or [`GithubClient::with_base_url`]
/// to point at a mock server in tests.
pub struct GithubClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    backoff_base_ms: u64,
}

impl GithubClient {
    /// Creates a new client pointed at the production GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        token: Option<String>,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, GithubError> {
        Self::with_base_url(
            timeout_secs,
            user_agent,
            token,
            max_retries,
            backoff_base_ms,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GithubError::InvalidUrl`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        token: Option<String>,
        max_retries: u32,
        backoff_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, GithubError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join appends path segments instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|e| GithubError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Fetches the bounded profile for one GitHub user: identity fields,
    /// counters, bio, and the top five repositories by stargazer count.
    ///
    /// Returns `Ok(None)` when the user does not exist. Transient errors
    /// (429, 5xx, network) are retried with exponential backoff.
    ///
    /// # Errors
    ///
    /// - [`GithubError::InvalidHandle`] — handle is empty or not URL-safe.
    /// - [`GithubError::RateLimited`] — rate limit still exceeded after retries.
    /// - [`GithubError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`GithubError::Http`] — network failure after retries.
    /// - [`GithubError::Deserialize`] — response body is not the expected shape.
    pub async fn fetch_profile(&self, handle: &str) -> Result<Option<Profile>, GithubError> {
        let user_url = self.user_url(handle)?;
        let repos_url = self.repos_url(handle)?;

        let Some(user_body) = self.get_with_retry(&user_url).await? else {
            tracing::info!(handle, "GitHub user not found");
            return Ok(None);
        };
        let user: UserResponse =
            serde_json::from_str(&user_body).map_err(|e| GithubError::Deserialize {
                context: format!("user({handle})"),
                source: e,
            })?;

        // A 404 on the repo listing for an existing user is treated as an
        // empty repo list rather than an absent profile.
        let repos: Vec<RepoResponse> = match self.get_with_retry(&repos_url).await? {
            Some(body) => {
                serde_json::from_str(&body).map_err(|e| GithubError::Deserialize {
                    context: format!("repos({handle})"),
                    source: e,
                })?
            }
            None => Vec::new(),
        };

        tracing::debug!(handle, repo_count = repos.len(), "fetched GitHub profile");
        Ok(Some(assemble_profile(user, repos)))
    }

    async fn get_with_retry(&self, url: &Url) -> Result<Option<String>, GithubError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move { self.get(&url).await }
        })
        .await
    }

    async fn get(&self, url: &Url) -> Result<Option<String>, GithubError> {
        let mut request = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        // GitHub signals rate limiting as 429, or as 403 with a drained
        // x-ratelimit-remaining header.
        if status == StatusCode::TOO_MANY_REQUESTS
            || (status == StatusCode::FORBIDDEN && rate_limit_drained(&response))
        {
            return Err(GithubError::RateLimited {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(GithubError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(Some(response.text().await?))
    }

    pub(crate) fn user_url(&self, handle: &str) -> Result<Url, GithubError> {
        let handle = validate_handle(handle)?;
        self.join_path(&format!("users/{handle}"))
    }

    pub(crate) fn repos_url(&self, handle: &str) -> Result<Url, GithubError> {
        let handle = validate_handle(handle)?;
        let mut url = self.join_path(&format!("users/{handle}/repos"))?;
        url.query_pairs_mut()
            .append_pair("per_page", &REPOS_PER_PAGE.to_string());
        Ok(url)
    }

    fn join_path(&self, path: &str) -> Result<Url, GithubError> {
        self.base_url
            .join(path)
            .map_err(|e| GithubError::InvalidUrl(e.to_string()))
    }
}

fn rate_limit_drained(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "0")
}

/// Rejects handles that are empty or would change the request path.
///
/// Stricter GitHub username syntax is deliberately not enforced here; an
/// unknown-but-safe handle simply resolves to a 404 and an absent profile.
pub(crate) fn validate_handle(handle: &str) -> Result<&str, GithubError> {
    if handle.trim().is_empty() {
        return Err(GithubError::InvalidHandle {
            handle: handle.to_owned(),
            reason: "handle is empty".to_owned(),
        });
    }
    if handle
        .chars()
        .any(|c| c == '/' || c == '?' || c == '#' || c.is_whitespace())
    {
        return Err(GithubError::InvalidHandle {
            handle: handle.to_owned(),
            reason: "handle contains URL-unsafe characters".to_owned(),
        });
    }
    Ok(handle)
}

pub(crate) fn assemble_profile(user: UserResponse, repos: Vec<RepoResponse>) -> Profile {
    Profile {
        name: empty_to_none(user.name),
        login: user.login,
        bio: empty_to_none(user.bio),
        followers: user.followers,
        following: user.following,
        repos_count: user.public_repos,
        avatar_url: empty_to_none(user.avatar_url),
        location: empty_to_none(user.location),
        blog: empty_to_none(user.blog),
        twitter: empty_to_none(user.twitter_username),
        top_repos: rank_top_repos(repos),
    }
}

/// Sorts by stargazer count descending and keeps the top [`TOP_REPO_LIMIT`].
pub(crate) fn rank_top_repos(mut repos: Vec<RepoResponse>) -> Vec<TopRepo> {
    repos.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    repos
        .into_iter()
        .take(TOP_REPO_LIMIT)
        .map(|repo| TopRepo {
            name: repo.name,
            url: repo.html_url,
            description: empty_to_none(repo.description),
            language: repo.language,
            stars: repo.stargazers_count,
            homepage: empty_to_none(repo.homepage),
        })
        .collect()
}

