//! Domain layer - Core business logic and entities

pub mod api_key;
pub mod document;
pub mod error;
pub mod usage;

pub use api_key::{ApiKeyRecord, ApiKeyRepository, ApiKeyValidationError};
pub use document::{classify, DocumentType, ValidationResult};
pub use error::DomainError;
pub use usage::{ConsumeOutcome, UsageRecord, UsageRepository};
