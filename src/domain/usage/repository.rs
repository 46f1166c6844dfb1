//! Usage repository trait

use async_trait::async_trait;
use chrono::NaiveDate;

use super::record::ConsumeOutcome;
use crate::domain::DomainError;

/// Repository for per-key daily usage counters
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsageRepository: Send + Sync {
    /// Consume one unit of `key`'s quota for `day` if the limit allows it.
    ///
    /// The key lookup, the limit check and the increment are a single atomic
    /// step per (key, day): concurrent callers can never push the count past
    /// the key's daily limit, and a rejected call leaves the count untouched.
    async fn try_consume(&self, key: &str, day: NaiveDate) -> Result<ConsumeOutcome, DomainError>;

    /// Requests admitted for `key` on `day` (0 when there is no counter yet)
    async fn count_for_day(&self, key: &str, day: NaiveDate) -> Result<u32, DomainError>;
}
