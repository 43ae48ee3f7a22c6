//! GitHub profile retrieval for DevDuel.
//!
//! Fetches a bounded profile per subject (identity, counters, bio, top five
//! repositories by stars) via the GitHub REST API, and joins two concurrent
//! fetches into a pair for the comparison pipeline. Retrieval failures fail
//! closed: a subject that cannot be fetched is reported as absent, never as
//! a default/empty profile.

mod client;
#[cfg(test)]
mod client_test;
mod error;
mod pair;
mod retry;
mod types;

pub use client::GithubClient;
pub use error::GithubError;
pub use pair::fetch_pair;
pub use types::{Profile, TopRepo};
