//! The daily quota gate.
//!
//! Admission and commit are two separate operations, so two concurrent runs
//! can both pass admission before either commits. The contract closes that
//! check-then-act race at the commit: [`QuotaStore::commit`] must be an
//! atomic increment-if-below-limit, and a commit that would push the counter
//! over the limit is denied post-hoc — the run reports quota-denied even
//! though its model call already succeeded.

use std::collections::HashMap;
use std::future::Future;

use chrono::NaiveDate;
use thiserror::Error;
use tokio::sync::Mutex;

/// Outcome of the pre-flight admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    Admitted,
    Denied,
}

/// Outcome of the post-success commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaCommit {
    /// The increment was applied; `count` is the new value for the day.
    Committed { count: i64 },
    /// The counter was already at the limit — the run must be reported as
    /// quota-denied even though it got this far.
    Denied,
}

/// A fault in the quota backing store itself (not a denial).
#[derive(Debug, Error)]
#[error("quota store error: {0}")]
pub struct QuotaStoreError(pub String);

/// Persistent daily counter keyed by calendar day.
///
/// `day` is the caller's local calendar day; the store never interprets it.
/// `admit` must not mutate state. `commit` must be atomic: at
/// `count = limit - 1`, exactly one of two concurrent commits may succeed.
pub trait QuotaStore: Send + Sync {
    /// Checks whether a run may start today. Read-only.
    fn admit(
        &self,
        day: NaiveDate,
    ) -> impl Future<Output = Result<QuotaDecision, QuotaStoreError>> + Send;

    /// Atomically consumes one slot for `day`, or denies if none remain.
    fn commit(
        &self,
        day: NaiveDate,
    ) -> impl Future<Output = Result<QuotaCommit, QuotaStoreError>> + Send;
}

/// In-process quota store with the same atomic-commit semantics as the
/// Postgres-backed one. Suitable for the CLI and for tests; a multi-instance
/// service must use a shared external counter instead.
pub struct MemoryQuotaStore {
    limit: i64,
    days: Mutex<HashMap<NaiveDate, i64>>,
}

impl MemoryQuotaStore {
    /// `limit` must be > 0; enforced by configuration loading upstream.
    #[must_use]
    pub fn new(limit: i64) -> Self {
        Self {
            limit,
            days: Mutex::new(HashMap::new()),
        }
    }
}

impl QuotaStore for MemoryQuotaStore {
    async fn admit(&self, day: NaiveDate) -> Result<QuotaDecision, QuotaStoreError> {
        let days = self.days.lock().await;
        let count = days.get(&day).copied().unwrap_or(0);
        if count >= self.limit {
            Ok(QuotaDecision::Denied)
        } else {
            Ok(QuotaDecision::Admitted)
        }
    }

    async fn commit(&self, day: NaiveDate) -> Result<QuotaCommit, QuotaStoreError> {
        let mut days = self.days.lock().await;
        let count = days.entry(day).or_insert(0);
        if *count >= self.limit {
            return Ok(QuotaCommit::Denied);
        }
        *count += 1;
        Ok(QuotaCommit::Committed { count: *count })
    }
}
