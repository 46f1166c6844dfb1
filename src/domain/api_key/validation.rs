//! Validation of administrative input for API keys

use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur while validating admin input
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiKeyValidationError {
    #[error("Key prefix must have at least {0} characters")]
    PrefixTooShort(usize),

    #[error("daily_limit must be > 0")]
    NonPositiveLimit,

    #[error("daily_limit exceeds maximum of {0}")]
    LimitTooLarge(u32),

    #[error("Provide plan and/or daily_limit")]
    EmptyUpdate,

    #[error("Plan cannot be empty")]
    EmptyPlan,
}

impl From<ApiKeyValidationError> for DomainError {
    fn from(err: ApiKeyValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// Shortest prefix accepted when resolving a key
pub const MIN_PREFIX_LENGTH: usize = 4;

/// Validate a key prefix used by admin operations
pub fn validate_key_prefix(prefix: &str) -> Result<(), ApiKeyValidationError> {
    if prefix.chars().count() < MIN_PREFIX_LENGTH {
        return Err(ApiKeyValidationError::PrefixTooShort(MIN_PREFIX_LENGTH));
    }

    Ok(())
}

/// Validate a requested daily limit and narrow it to the stored type
pub fn validate_daily_limit(limit: i64) -> Result<u32, ApiKeyValidationError> {
    if limit <= 0 {
        return Err(ApiKeyValidationError::NonPositiveLimit);
    }

    u32::try_from(limit).map_err(|_| ApiKeyValidationError::LimitTooLarge(u32::MAX))
}

/// Validate a plan label
pub fn validate_plan(plan: &str) -> Result<(), ApiKeyValidationError> {
    if plan.trim().is_empty() {
        return Err(ApiKeyValidationError::EmptyPlan);
    }

    Ok(())
}
