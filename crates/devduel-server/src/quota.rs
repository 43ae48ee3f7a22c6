//! Postgres-backed quota store.
//!
//! The counter lives in the shared database, never in process memory, so
//! every service instance enforces the same daily budget. The commit is the
//! single conditional upsert in `devduel_db::quota`, which is what makes the
//! admission/commit split safe under concurrent requests.

use chrono::NaiveDate;
use sqlx::PgPool;

use devduel_compare::{QuotaCommit, QuotaDecision, QuotaStore, QuotaStoreError};

#[derive(Clone)]
pub struct PgQuotaStore {
    pool: PgPool,
    limit: i64,
}

impl PgQuotaStore {
    /// `limit` must be > 0; enforced by configuration loading.
    #[must_use]
    pub fn new(pool: PgPool, limit: i64) -> Self {
        Self { pool, limit }
    }
}

impl QuotaStore for PgQuotaStore {
    async fn admit(&self, day: NaiveDate) -> Result<QuotaDecision, QuotaStoreError> {
        let count = devduel_db::get_quota_count(&self.pool, day)
            .await
            .map_err(|e| QuotaStoreError(e.to_string()))?;

        if i64::from(count) >= self.limit {
            Ok(QuotaDecision::Denied)
        } else {
            Ok(QuotaDecision::Admitted)
        }
    }

    async fn commit(&self, day: NaiveDate) -> Result<QuotaCommit, QuotaStoreError> {
        let committed = devduel_db::try_commit_quota(&self.pool, day, self.limit)
            .await
            .map_err(|e| QuotaStoreError(e.to_string()))?;

        Ok(match committed {
            Some(count) => QuotaCommit::Committed {
                count: i64::from(count),
            },
            None => QuotaCommit::Denied,
        })
    }
}
