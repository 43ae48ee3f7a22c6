//! Profile record and raw GitHub API response shapes.

use serde::{Deserialize, Serialize};

/// Maximum number of ranked repositories kept per profile.
pub const TOP_REPO_LIMIT: usize = 5;

/// Bounded profile record for one subject.
///
/// All-or-nothing per subject: retrieval yields `Some(Profile)` or `None`,
/// never a partially populated record. Individual fields may still be null
/// where GitHub returns null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: Option<String>,
    pub login: String,
    pub bio: Option<String>,
    pub followers: i64,
    pub following: i64,
    pub repos_count: i64,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
    pub blog: Option<String>,
    pub twitter: Option<String>,
    /// Up to [`TOP_REPO_LIMIT`] repositories, ranked by stargazer count descending.
    pub top_repos: Vec<TopRepo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopRepo {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: i64,
    pub homepage: Option<String>,
}

/// Raw shape of `GET /users/{login}`.
#[derive(Debug, Deserialize)]
pub(crate) struct UserResponse {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub followers: i64,
    #[serde(default)]
    pub following: i64,
    #[serde(default)]
    pub public_repos: i64,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
    pub blog: Option<String>,
    pub twitter_username: Option<String>,
}

/// Raw shape of one entry from `GET /users/{login}/repos`.
#[derive(Debug, Deserialize)]
pub(crate) struct RepoResponse {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: i64,
    pub homepage: Option<String>,
}

/// GitHub returns `""` rather than null for several optional string fields.
pub(crate) fn empty_to_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
