use crate::client::{rank_top_repos, validate_handle, GithubClient};
use crate::error::GithubError;
use crate::types::RepoResponse;

fn test_client() -> GithubClient {
    GithubClient::new(30, "devduel-test/0.1", None, 0, 0).expect("client construction")
}

fn repo(name: &str, stars: i64) -> RepoResponse {
    serde_json::from_value(serde_json::json!({
        "name": name,
        "html_url": format!("https://github.com/x/{name}"),
        "description": null,
        "language": "Rust",
        "stargazers_count": stars,
        "homepage": null
    }))
    .expect("repo fixture")
}

#[test]
fn user_url_for_plain_handle() {
    let url = test_client().user_url("alice").unwrap();
    assert_eq!(url.as_str(), "https://api.github.com/users/alice");
}

#[test]
fn repos_url_includes_per_page() {
    let url = test_client().repos_url("alice").unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.github.com/users/alice/repos?per_page=100"
    );
}

#[test]
fn with_base_url_strips_trailing_slash() {
    let client = GithubClient::with_base_url(30, "ua", None, 0, 0, "http://localhost:9999/")
        .expect("client construction");
    let url = client.user_url("bob").unwrap();
    assert_eq!(url.as_str(), "http://localhost:9999/users/bob");
}

#[test]
fn validate_handle_rejects_empty() {
    let err = validate_handle("").unwrap_err();
    assert!(matches!(err, GithubError::InvalidHandle { .. }));
}

#[test]
fn validate_handle_rejects_whitespace_only() {
    let err = validate_handle("   ").unwrap_err();
    assert!(matches!(err, GithubError::InvalidHandle { .. }));
}

#[test]
fn validate_handle_rejects_path_traversal() {
    for bad in ["a/b", "a?x=1", "a#frag", "a b"] {
        let err = validate_handle(bad).unwrap_err();
        assert!(
            matches!(err, GithubError::InvalidHandle { .. }),
            "expected InvalidHandle for {bad:?}"
        );
    }
}

#[test]
fn validate_handle_accepts_hyphenated() {
    assert_eq!(validate_handle("shah-ashish").unwrap(), "shah-ashish");
}

#[test]
fn rank_top_repos_sorts_by_stars_descending() {
    let ranked = rank_top_repos(vec![repo("low", 1), repo("high", 500), repo("mid", 42)]);
    let names: Vec<_> = ranked.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["high", "mid", "low"]);
    assert_eq!(ranked[0].stars, 500);
}

#[test]
fn rank_top_repos_keeps_at_most_five() {
    let repos = (0..8).map(|i| repo(&format!("r{i}"), i)).collect();
    let ranked = rank_top_repos(repos);
    assert_eq!(ranked.len(), 5);
    assert_eq!(ranked[0].name, "r7");
}

#[test]
fn rank_top_repos_empty_input() {
    assert!(rank_top_repos(Vec::new()).is_empty());
}
