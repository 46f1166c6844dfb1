//! API key entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Plan assigned to keys created without an explicit plan
pub const DEFAULT_PLAN: &str = "free";

/// Daily limit assigned to keys created without an explicit limit
pub const DEFAULT_DAILY_LIMIT: u32 = 100;

/// A stored API key with its plan and daily request cap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    key: String,
    plan: String,
    daily_limit: u32,
    created_at: DateTime<Utc>,
}

impl ApiKeyRecord {
    /// Create a new record; `daily_limit` is expected to be validated already
    pub fn new(key: impl Into<String>, plan: impl Into<String>, daily_limit: u32) -> Self {
        Self {
            key: key.into(),
            plan: plan.into(),
            daily_limit,
            created_at: Utc::now(),
        }
    }

    /// Rebuild a record loaded from storage
    pub fn from_parts(
        key: impl Into<String>,
        plan: impl Into<String>,
        daily_limit: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key: key.into(),
            plan: plan.into(),
            daily_limit,
            created_at,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn plan(&self) -> &str {
        &self.plan
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_plan(&mut self, plan: impl Into<String>) {
        self.plan = plan.into();
    }

    pub fn set_daily_limit(&mut self, daily_limit: u32) {
        self.daily_limit = daily_limit;
    }

    /// Key in `first6...last6` form, safe to show in listings
    pub fn masked_key(&self) -> String {
        mask_key(&self.key)
    }
}

/// Mask a key for display.
///
/// Keys longer than 12 characters keep their first and last six
/// characters; anything shorter is fully hidden.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();

    if chars.len() <= 12 {
        return "****".to_string();
    }

    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();

    format!("{}...{}", head, tail)
}
