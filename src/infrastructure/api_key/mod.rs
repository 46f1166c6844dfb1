//! API Key infrastructure implementations
//!
//! Key generation and the administrative key service.

mod generator;
mod service;

pub use generator::{constant_time_compare, ApiKeyGenerator};
pub use service::{ApiKeyService, UpdateApiKeyRequest};
