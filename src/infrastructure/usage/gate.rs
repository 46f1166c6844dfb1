//! Quota gate
//!
//! Admits a request only when the presented key exists and still has quota
//! left for the day, consuming exactly one unit per admission.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::api_key::{mask_key, ApiKeyRecord};
use crate::domain::usage::{ConsumeOutcome, UsageRecord, UsageRepository};
use crate::domain::DomainError;

/// Reasons a request is not admitted
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Missing or invalid API key")]
    Unauthenticated,

    #[error("Daily limit reached ({limit}/day), try again tomorrow")]
    QuotaExceeded { limit: u32 },

    #[error(transparent)]
    Storage(#[from] DomainError),
}

/// A request that passed the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmittedKey {
    pub record: ApiKeyRecord,
    /// Today's counter, including this request
    pub usage: UsageRecord,
}

impl AdmittedKey {
    /// Requests left for the day after this one
    pub fn remaining(&self) -> u32 {
        self.usage.remaining(self.record.daily_limit())
    }
}

/// Enforces per-key daily quotas
pub struct QuotaGate {
    usage: Arc<dyn UsageRepository>,
}

impl QuotaGate {
    pub fn new(usage: Arc<dyn UsageRepository>) -> Self {
        Self { usage }
    }

    /// Admit `presented_key` for `today` or say why not.
    ///
    /// A rejected request never increments the counter.
    pub async fn admit(
        &self,
        presented_key: Option<&str>,
        today: NaiveDate,
    ) -> Result<AdmittedKey, GateError> {
        let key = presented_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(GateError::Unauthenticated)?;

        match self.usage.try_consume(key, today).await? {
            ConsumeOutcome::UnknownKey => {
                debug!(key = %mask_key(key), "Rejected unknown API key");
                Err(GateError::Unauthenticated)
            }
            ConsumeOutcome::Exhausted { record, used } => {
                warn!(
                    key = %record.masked_key(),
                    used,
                    limit = record.daily_limit(),
                    "Daily quota exhausted"
                );
                Err(GateError::QuotaExceeded {
                    limit: record.daily_limit(),
                })
            }
            ConsumeOutcome::Admitted { record, used } => {
                debug!(key = %record.masked_key(), used, "Request admitted");
                let usage = UsageRecord::new(record.key(), today, used);
                Ok(AdmittedKey { record, usage })
            }
        }
    }
}

impl std::fmt::Debug for QuotaGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuotaGate").finish_non_exhaustive()
    }
}
