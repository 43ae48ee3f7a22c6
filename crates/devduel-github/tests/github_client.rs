//! Integration tests for `GithubClient` and `fetch_pair` using wiremock.

use devduel_github::{fetch_pair, GithubClient, GithubError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GithubClient {
    GithubClient::with_base_url(30, "devduel-test/0.1", None, 0, 0, base_url)
        .expect("client construction should not fail")
}

fn user_body(login: &str, followers: i64) -> serde_json::Value {
    serde_json::json!({
        "login": login,
        "name": "Alice Example",
        "bio": "systems tinkerer",
        "followers": followers,
        "following": 12,
        "public_repos": 30,
        "avatar_url": "https://avatars.example/alice.png",
        "location": "Berlin",
        "blog": "",
        "twitter_username": null
    })
}

fn repos_body() -> serde_json::Value {
    serde_json::json!([
        {
            "name": "small",
            "html_url": "https://github.com/alice/small",
            "description": "a small tool",
            "language": "Rust",
            "stargazers_count": 3,
            "homepage": null
        },
        {
            "name": "big",
            "html_url": "https://github.com/alice/big",
            "description": null,
            "language": "Go",
            "stargazers_count": 900,
            "homepage": ""
        }
    ])
}

async fn mount_user(server: &MockServer, login: &str, followers: i64) {
    Mock::given(method("GET"))
        .and(path(format!("/users/{login}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body(login, followers)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/users/{login}/repos")))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repos_body()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_profile_returns_ranked_profile() {
    let server = MockServer::start().await;
    mount_user(&server, "alice", 77).await;

    let client = test_client(&server.uri());
    let profile = client
        .fetch_profile("alice")
        .await
        .expect("fetch should succeed")
        .expect("user should be present");

    assert_eq!(profile.login, "alice");
    assert_eq!(profile.followers, 77);
    assert_eq!(profile.repos_count, 30);
    // Empty-string blog is normalized to None.
    assert!(profile.blog.is_none());
    // Repos ranked by stars descending.
    assert_eq!(profile.top_repos.len(), 2);
    assert_eq!(profile.top_repos[0].name, "big");
    assert_eq!(profile.top_repos[0].stars, 900);
    assert!(profile.top_repos[0].homepage.is_none());
}

#[tokio::test]
async fn fetch_profile_not_found_is_absent_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/doesnotexist123"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let profile = client
        .fetch_profile("doesnotexist123")
        .await
        .expect("a 404 is not a transport error");
    assert!(profile.is_none());
}

#[tokio::test]
async fn fetch_profile_server_error_is_typed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/alice"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_profile("alice").await.unwrap_err();
    assert!(
        matches!(err, GithubError::UnexpectedStatus { status: 500, .. }),
        "expected UnexpectedStatus(500), got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_profile_rate_limit_is_typed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/alice"))
        .respond_with(
            ResponseTemplate::new(403).insert_header("x-ratelimit-remaining", "0"),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_profile("alice").await.unwrap_err();
    assert!(
        matches!(err, GithubError::RateLimited { status: 403 }),
        "expected RateLimited(403), got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_profile_repo_listing_404_yields_empty_top_repos() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body("alice", 1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/alice/repos"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let profile = client
        .fetch_profile("alice")
        .await
        .expect("fetch should succeed")
        .expect("user should be present");
    assert!(profile.top_repos.is_empty());
}

#[tokio::test]
async fn fetch_pair_waits_for_both_and_reports_absent_side_only() {
    let server = MockServer::start().await;
    mount_user(&server, "alice", 5).await;
    Mock::given(method("GET"))
        .and(path("/users/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let (a, b) = fetch_pair(&client, "alice", "ghost").await;

    assert!(a.is_some(), "succeeding side must not be dragged down");
    assert!(b.is_none(), "failing side must settle as absent");
    assert_eq!(a.unwrap().login, "alice");
}

#[tokio::test]
async fn fetch_pair_transport_failure_fails_closed() {
    let server = MockServer::start().await;
    mount_user(&server, "bob", 9).await;
    Mock::given(method("GET"))
        .and(path("/users/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let (a, b) = fetch_pair(&client, "broken", "bob").await;

    assert!(a.is_none());
    assert_eq!(b.unwrap().login, "bob");
}
