//! API key repository trait

use async_trait::async_trait;

use super::entity::ApiKeyRecord;
use crate::domain::DomainError;

/// Repository trait for API key storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    /// Keys starting with `prefix`, at most `limit` of them.
    ///
    /// Matching is literal: no character in `prefix` acts as a wildcard.
    async fn find_by_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<ApiKeyRecord>, DomainError>;

    /// Store a new API key
    async fn create(&self, record: ApiKeyRecord) -> Result<ApiKeyRecord, DomainError>;

    /// Overwrite plan and daily limit of an existing key
    async fn update(&self, record: &ApiKeyRecord) -> Result<ApiKeyRecord, DomainError>;

    /// Delete a key together with all of its usage counters
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// All keys, newest first
    async fn list(&self) -> Result<Vec<ApiKeyRecord>, DomainError>;

    /// Number of stored keys
    async fn count(&self) -> Result<usize, DomainError>;
}
