//! API Key domain
//!
//! Key records, admin input validation and the repository trait used by the
//! key administration endpoints and the quota gate.

mod entity;
mod repository;
mod validation;

pub use entity::{mask_key, ApiKeyRecord, DEFAULT_DAILY_LIMIT, DEFAULT_PLAN};
#[cfg(test)]
pub use repository::MockApiKeyRepository;
pub use repository::ApiKeyRepository;
pub use validation::{
    validate_daily_limit, validate_key_prefix, validate_plan, ApiKeyValidationError,
    MIN_PREFIX_LENGTH,
};
