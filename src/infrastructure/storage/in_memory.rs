//! In-memory key registry

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::domain::api_key::{ApiKeyRecord, ApiKeyRepository};
use crate::domain::usage::{ConsumeOutcome, UsageRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct RegistryState {
    keys: HashMap<String, ApiKeyRecord>,
    usage: HashMap<(String, NaiveDate), u32>,
}

/// In-memory implementation of both registry repositories.
///
/// Keys and usage counters share one lock so that quota consumption and
/// cascading deletes are atomic, exactly like the transactional backend.
#[derive(Debug, Default)]
pub struct InMemoryKeyRegistry {
    state: Mutex<RegistryState>,
}

impl InMemoryKeyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with initial keys
    pub fn with_keys(keys: Vec<ApiKeyRecord>) -> Self {
        let keys = keys
            .into_iter()
            .map(|k| (k.key().to_string(), k))
            .collect();

        Self {
            state: Mutex::new(RegistryState {
                keys,
                usage: HashMap::new(),
            }),
        }
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryKeyRegistry {
    async fn find_by_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<ApiKeyRecord>, DomainError> {
        let state = self.state.lock().await;

        let result = state
            .keys
            .values()
            .filter(|k| k.key().starts_with(prefix))
            .take(limit)
            .cloned()
            .collect();

        Ok(result)
    }

    async fn create(&self, record: ApiKeyRecord) -> Result<ApiKeyRecord, DomainError> {
        let mut state = self.state.lock().await;

        if state.keys.contains_key(record.key()) {
            return Err(DomainError::conflict("API key already exists"));
        }

        state.keys.insert(record.key().to_string(), record.clone());
        Ok(record)
    }

    async fn update(&self, record: &ApiKeyRecord) -> Result<ApiKeyRecord, DomainError> {
        let mut state = self.state.lock().await;

        match state.keys.get_mut(record.key()) {
            Some(existing) => {
                existing.set_plan(record.plan());
                existing.set_daily_limit(record.daily_limit());
                Ok(existing.clone())
            }
            None => Err(DomainError::not_found(format!(
                "API key '{}' not found",
                record.masked_key()
            ))),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let mut state = self.state.lock().await;

        let removed = state.keys.remove(key).is_some();
        state.usage.retain(|(k, _), _| k != key);

        Ok(removed)
    }

    async fn list(&self) -> Result<Vec<ApiKeyRecord>, DomainError> {
        let state = self.state.lock().await;

        let mut keys: Vec<ApiKeyRecord> = state.keys.values().cloned().collect();
        keys.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.key().cmp(b.key()))
        });

        Ok(keys)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let state = self.state.lock().await;
        Ok(state.keys.len())
    }
}

#[async_trait]
impl UsageRepository for InMemoryKeyRegistry {
    async fn try_consume(&self, key: &str, day: NaiveDate) -> Result<ConsumeOutcome, DomainError> {
        let mut state = self.state.lock().await;

        let Some(record) = state.keys.get(key).cloned() else {
            return Ok(ConsumeOutcome::UnknownKey);
        };

        let used = state
            .usage
            .get(&(key.to_string(), day))
            .copied()
            .unwrap_or(0);

        if used >= record.daily_limit() {
            return Ok(ConsumeOutcome::Exhausted { used, record });
        }

        let count = state.usage.entry((key.to_string(), day)).or_insert(0);
        *count += 1;

        Ok(ConsumeOutcome::Admitted {
            used: *count,
            record,
        })
    }

    async fn count_for_day(&self, key: &str, day: NaiveDate) -> Result<u32, DomainError> {
        let state = self.state.lock().await;
        Ok(state.usage.get(&(key.to_string(), day)).copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn registry_with(key: &str, limit: u32) -> InMemoryKeyRegistry {
        InMemoryKeyRegistry::with_keys(vec![ApiKeyRecord::new(key, "free", limit)])
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let registry = InMemoryKeyRegistry::new();
        registry
            .create(ApiKeyRecord::new("key-one-abcdef", "free", 10))
            .await
            .unwrap();

        let found = registry.find_by_prefix("key-one", 2).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].daily_limit(), 10);
        assert!(registry.find_by_prefix("missing", 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_conflicts() {
        let registry = registry_with("dup-key", 1);
        let result = registry.create(ApiKeyRecord::new("dup-key", "free", 1)).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_find_by_prefix_is_literal() {
        let registry = InMemoryKeyRegistry::with_keys(vec![
            ApiKeyRecord::new("ab_cd-1111", "free", 1),
            ApiKeyRecord::new("abXcd-2222", "free", 1),
        ]);

        let matches = registry.find_by_prefix("ab_c", 2).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].key(), "ab_cd-1111");
    }

    #[tokio::test]
    async fn test_find_by_prefix_respects_limit() {
        let registry = InMemoryKeyRegistry::with_keys(vec![
            ApiKeyRecord::new("same-1", "free", 1),
            ApiKeyRecord::new("same-2", "free", 1),
            ApiKeyRecord::new("same-3", "free", 1),
        ]);

        assert_eq!(registry.find_by_prefix("same", 2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_key() {
        let registry = InMemoryKeyRegistry::new();
        let result = registry.update(&ApiKeyRecord::new("nope", "free", 1)).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_consume_until_exhausted() {
        let registry = registry_with("k", 3);

        for expected in 1..=3 {
            match registry.try_consume("k", day(1)).await.unwrap() {
                ConsumeOutcome::Admitted { used, .. } => assert_eq!(used, expected),
                other => panic!("unexpected outcome: {:?}", other),
            }
        }

        for _ in 0..3 {
            assert!(matches!(
                registry.try_consume("k", day(1)).await.unwrap(),
                ConsumeOutcome::Exhausted { used: 3, .. }
            ));
        }

        assert_eq!(registry.count_for_day("k", day(1)).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_exhausted_consume_leaves_no_usage_row() {
        let registry = registry_with("zero", 0);

        assert!(matches!(
            registry.try_consume("zero", day(1)).await.unwrap(),
            ConsumeOutcome::Exhausted { used: 0, .. }
        ));
        assert!(registry.state.lock().await.usage.is_empty());
    }

    #[tokio::test]
    async fn test_counters_are_per_day() {
        let registry = registry_with("k", 1);

        assert!(matches!(
            registry.try_consume("k", day(1)).await.unwrap(),
            ConsumeOutcome::Admitted { .. }
        ));
        assert!(matches!(
            registry.try_consume("k", day(2)).await.unwrap(),
            ConsumeOutcome::Admitted { .. }
        ));
        assert_eq!(registry.count_for_day("k", day(3)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_key() {
        let registry = InMemoryKeyRegistry::new();

        assert_eq!(
            registry.try_consume("ghost", day(1)).await.unwrap(),
            ConsumeOutcome::UnknownKey
        );
    }

    #[tokio::test]
    async fn test_delete_cascades_to_usage() {
        let registry = registry_with("k", 5);
        registry.try_consume("k", day(1)).await.unwrap();
        registry.try_consume("k", day(2)).await.unwrap();

        assert!(registry.delete("k").await.unwrap());
        assert!(!registry.delete("k").await.unwrap());

        registry.create(ApiKeyRecord::new("k", "free", 5)).await.unwrap();
        assert_eq!(registry.count_for_day("k", day(1)).await.unwrap(), 0);
        assert_eq!(registry.count_for_day("k", day(2)).await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_consumption_never_exceeds_limit() {
        let registry = Arc::new(registry_with("k", 25));

        let handles: Vec<_> = (0..40)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.try_consume("k", day(1)).await.unwrap() })
            })
            .collect();

        let mut admitted = 0;
        let mut exhausted = 0;

        for handle in handles {
            match handle.await.unwrap() {
                ConsumeOutcome::Admitted { .. } => admitted += 1,
                ConsumeOutcome::Exhausted { .. } => exhausted += 1,
                ConsumeOutcome::UnknownKey => panic!("key should exist"),
            }
        }

        assert_eq!(admitted, 25);
        assert_eq!(exhausted, 15);
        assert_eq!(registry.count_for_day("k", day(1)).await.unwrap(), 25);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let registry = InMemoryKeyRegistry::new();
        let older = ApiKeyRecord::from_parts(
            "older-key",
            "free",
            1,
            chrono::Utc::now() - chrono::Duration::hours(1),
        );
        registry.create(older).await.unwrap();
        registry
            .create(ApiKeyRecord::new("newer-key", "pro", 2))
            .await
            .unwrap();

        let keys = registry.list().await.unwrap();
        assert_eq!(keys[0].key(), "newer-key");
        assert_eq!(keys[1].key(), "older-key");
        assert_eq!(registry.count().await.unwrap(), 2);
    }
}
