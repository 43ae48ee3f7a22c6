//! Dual-subject fetch: two concurrent retrievals, joined.

use crate::client::GithubClient;
use crate::types::Profile;

/// Fetches both subjects' profiles concurrently and waits for both to settle.
///
/// This is a fan-out/fan-in join, not a race: a slow or failing fetch for one
/// subject never blocks, aborts, or starves the other, and the pair is only
/// returned once both branches have completed. Each branch fails closed —
/// any retrieval error is logged and reported as `None` for that slot only,
/// never coerced into a default profile.
///
/// Idempotent and safe to retry as a whole; no side effects beyond the
/// underlying GET requests.
pub async fn fetch_pair(
    client: &GithubClient,
    handle_a: &str,
    handle_b: &str,
) -> (Option<Profile>, Option<Profile>) {
    let (result_a, result_b) = tokio::join!(
        client.fetch_profile(handle_a),
        client.fetch_profile(handle_b),
    );

    (
        settle(handle_a, result_a),
        settle(handle_b, result_b),
    )
}

fn settle(
    handle: &str,
    result: Result<Option<Profile>, crate::error::GithubError>,
) -> Option<Profile> {
    match result {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(handle, error = %e, "profile fetch failed — treating subject as absent");
            None
        }
    }
}
