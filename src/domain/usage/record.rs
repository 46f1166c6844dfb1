//! Daily usage counters

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::api_key::ApiKeyRecord;

/// Requests admitted for one key on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub key: String,
    pub day: NaiveDate,
    pub count: u32,
}

impl UsageRecord {
    pub fn new(key: impl Into<String>, day: NaiveDate, count: u32) -> Self {
        Self {
            key: key.into(),
            day,
            count,
        }
    }

    /// Requests still available under `limit`
    pub fn remaining(&self, limit: u32) -> u32 {
        limit.saturating_sub(self.count)
    }
}

/// Outcome of an atomic check-and-increment against a key's daily limit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// No key matches the presented value
    UnknownKey,
    /// The limit was already reached; nothing was incremented
    Exhausted { record: ApiKeyRecord, used: u32 },
    /// One unit was consumed; `used` is the count after the increment
    Admitted { record: ApiKeyRecord, used: u32 },
}
