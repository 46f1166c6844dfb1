//! API Key service
//!
//! Provides the administrative operations over stored keys: creation,
//! listing, prefix resolution, plan/limit updates and revocation.

use std::sync::Arc;

use tracing::info;

use crate::domain::api_key::{
    validate_daily_limit, validate_key_prefix, validate_plan, ApiKeyRecord, ApiKeyRepository,
    ApiKeyValidationError,
};
use crate::domain::DomainError;

use super::generator::ApiKeyGenerator;

/// Partial update of a key's plan and/or daily limit
#[derive(Debug, Clone, Default)]
pub struct UpdateApiKeyRequest {
    pub plan: Option<String>,
    pub daily_limit: Option<i64>,
}

/// Validated form of [`UpdateApiKeyRequest`]
#[derive(Debug)]
struct ValidatedUpdate {
    plan: Option<String>,
    daily_limit: Option<u32>,
}

impl UpdateApiKeyRequest {
    fn validate(self) -> Result<ValidatedUpdate, ApiKeyValidationError> {
        if self.plan.is_none() && self.daily_limit.is_none() {
            return Err(ApiKeyValidationError::EmptyUpdate);
        }

        let daily_limit = self.daily_limit.map(validate_daily_limit).transpose()?;

        if let Some(plan) = &self.plan {
            validate_plan(plan)?;
        }

        Ok(ValidatedUpdate {
            plan: self.plan,
            daily_limit,
        })
    }
}

/// API Key service for managing API keys
pub struct ApiKeyService {
    repository: Arc<dyn ApiKeyRepository>,
    generator: ApiKeyGenerator,
}

impl std::fmt::Debug for ApiKeyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyService")
            .field("generator", &self.generator)
            .finish_non_exhaustive()
    }
}

impl ApiKeyService {
    /// Create a new API key service
    pub fn new(repository: Arc<dyn ApiKeyRepository>) -> Self {
        Self {
            repository,
            generator: ApiKeyGenerator::new(),
        }
    }

    /// Generate and store a new key. The returned record is the only place
    /// the full key is ever handed out.
    pub async fn create(&self, plan: &str, daily_limit: i64) -> Result<ApiKeyRecord, DomainError> {
        validate_plan(plan)?;
        let daily_limit = validate_daily_limit(daily_limit)?;

        let record = ApiKeyRecord::new(self.generator.generate(), plan, daily_limit);
        let created = self.repository.create(record).await?;

        info!(
            key = %created.masked_key(),
            plan = %created.plan(),
            daily_limit = created.daily_limit(),
            "API key created"
        );

        Ok(created)
    }

    /// List all keys, newest first
    pub async fn list(&self) -> Result<Vec<ApiKeyRecord>, DomainError> {
        self.repository.list().await
    }

    /// Count stored keys
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    /// Resolve a key prefix to exactly one stored key
    pub async fn resolve_prefix(&self, prefix: &str) -> Result<ApiKeyRecord, DomainError> {
        validate_key_prefix(prefix)?;

        let mut matches = self.repository.find_by_prefix(prefix, 2).await?;

        match matches.len() {
            0 => Err(DomainError::prefix_not_found(prefix)),
            1 => Ok(matches.remove(0)),
            _ => Err(DomainError::ambiguous_prefix(prefix)),
        }
    }

    /// Delete the key matching `prefix` along with its usage history
    pub async fn delete_by_prefix(&self, prefix: &str) -> Result<ApiKeyRecord, DomainError> {
        let record = self.resolve_prefix(prefix).await?;

        if !self.repository.delete(record.key()).await? {
            return Err(DomainError::prefix_not_found(prefix));
        }

        info!(key = %record.masked_key(), "API key deleted");

        Ok(record)
    }

    /// Update plan and/or daily limit of the key matching `prefix`.
    ///
    /// The request is fully validated before the registry is touched.
    pub async fn update_by_prefix(
        &self,
        prefix: &str,
        request: UpdateApiKeyRequest,
    ) -> Result<ApiKeyRecord, DomainError> {
        let update = request.validate()?;
        let mut record = self.resolve_prefix(prefix).await?;

        if let Some(plan) = update.plan {
            record.set_plan(plan);
        }

        if let Some(daily_limit) = update.daily_limit {
            record.set_daily_limit(daily_limit);
        }

        let updated = self.repository.update(&record).await?;

        info!(
            key = %updated.masked_key(),
            plan = %updated.plan(),
            daily_limit = updated.daily_limit(),
            "API key updated"
        );

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::MockApiKeyRepository;
    use crate::infrastructure::storage::InMemoryKeyRegistry;

    fn service_with(keys: Vec<ApiKeyRecord>) -> ApiKeyService {
        ApiKeyService::new(Arc::new(InMemoryKeyRegistry::with_keys(keys)))
    }

    #[tokio::test]
    async fn test_create_api_key() {
        let service = service_with(vec![]);

        let created = service.create("free", 100).await.unwrap();

        assert_eq!(created.key().len(), 32);
        assert_eq!(created.plan(), "free");
        assert_eq!(created.daily_limit(), 100);
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_limit() {
        let service = service_with(vec![]);

        let result = service.create("free", 0).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_resolve_prefix() {
        let service = service_with(vec![
            ApiKeyRecord::new("abcd1111xxxxxxxx", "free", 1),
            ApiKeyRecord::new("abcd2222xxxxxxxx", "free", 1),
            ApiKeyRecord::new("zzzz3333xxxxxxxx", "pro", 1),
        ]);

        let found = service.resolve_prefix("abcd1").await.unwrap();
        assert_eq!(found.key(), "abcd1111xxxxxxxx");

        assert!(matches!(
            service.resolve_prefix("abcd").await,
            Err(DomainError::AmbiguousPrefix { .. })
        ));
        assert!(matches!(
            service.resolve_prefix("nope").await,
            Err(DomainError::PrefixNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_short_prefix_never_reaches_storage() {
        let mut repo = MockApiKeyRepository::new();
        repo.expect_find_by_prefix().never();

        let service = ApiKeyService::new(Arc::new(repo));
        let result = service.resolve_prefix("abc").await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_delete_by_prefix() {
        let service = service_with(vec![ApiKeyRecord::new("delete-me-123456", "free", 1)]);

        let deleted = service.delete_by_prefix("delete").await.unwrap();

        assert_eq!(deleted.key(), "delete-me-123456");
        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_partial() {
        let service = service_with(vec![ApiKeyRecord::new("update-me-123456", "free", 10)]);

        let updated = service
            .update_by_prefix(
                "update",
                UpdateApiKeyRequest {
                    plan: None,
                    daily_limit: Some(50),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.plan(), "free");
        assert_eq!(updated.daily_limit(), 50);

        let updated = service
            .update_by_prefix(
                "update",
                UpdateApiKeyRequest {
                    plan: Some("pro".to_string()),
                    daily_limit: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.plan(), "pro");
        assert_eq!(updated.daily_limit(), 50);
    }

    #[tokio::test]
    async fn test_invalid_update_touches_nothing() {
        let mut repo = MockApiKeyRepository::new();
        repo.expect_find_by_prefix().never();
        repo.expect_update().never();

        let service = ApiKeyService::new(Arc::new(repo));

        let empty = service
            .update_by_prefix("abcd", UpdateApiKeyRequest::default())
            .await;
        assert!(matches!(empty, Err(DomainError::Validation { .. })));

        let negative = service
            .update_by_prefix(
                "abcd",
                UpdateApiKeyRequest {
                    plan: Some("pro".to_string()),
                    daily_limit: Some(-1),
                },
            )
            .await;
        assert!(matches!(negative, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let mut repo = MockApiKeyRepository::new();
        repo.expect_list()
            .returning(|| Err(DomainError::storage("connection reset")));

        let service = ApiKeyService::new(Arc::new(repo));

        assert!(matches!(
            service.list().await,
            Err(DomainError::Storage { .. })
        ));
    }
}
