//! Usage tracking domain
//!
//! Daily usage counters and the repository trait behind quota enforcement.

mod record;
mod repository;

pub use record::{ConsumeOutcome, UsageRecord};
#[cfg(test)]
pub use repository::MockUsageRepository;
pub use repository::UsageRepository;
