//! Storage factory for runtime backend selection

use std::sync::Arc;

use tracing::info;

use crate::domain::api_key::ApiKeyRepository;
use crate::domain::usage::UsageRepository;
use crate::domain::DomainError;

use super::in_memory::InMemoryKeyRegistry;
use super::migrations::run_storage_migrations;
use super::postgres::{PostgresConfig, PostgresKeyRegistry};

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Handles to the key and usage halves of one registry backend
#[derive(Clone)]
pub struct KeyRegistry {
    pub keys: Arc<dyn ApiKeyRepository>,
    pub usage: Arc<dyn UsageRepository>,
}

impl KeyRegistry {
    /// Wrap a backend that implements both repositories over shared state
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: ApiKeyRepository + UsageRepository + 'static,
    {
        Self {
            keys: backend.clone(),
            usage: backend,
        }
    }

    /// Empty in-memory registry
    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(InMemoryKeyRegistry::new()))
    }
}

impl std::fmt::Debug for KeyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyRegistry").finish_non_exhaustive()
    }
}

/// Factory for creating registry instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates a registry for the configured backend.
    ///
    /// PostgreSQL registries have their migrations applied before use.
    pub async fn create(config: &StorageConfig) -> Result<KeyRegistry, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory key registry");
                Ok(KeyRegistry::in_memory())
            }
            StorageConfig::Postgres(pg_config) => {
                info!("Connecting to PostgreSQL...");
                let pool = pg_config.connect().await?;
                info!("PostgreSQL connection established");

                run_storage_migrations(&pool).await?;

                Ok(KeyRegistry::from_backend(Arc::new(PostgresKeyRegistry::new(pool))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!(StorageType::from_str("memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("In-Memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("postgres"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("PG"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("sqlite"), None);
    }

    #[test]
    fn test_storage_config_type() {
        assert_eq!(StorageConfig::InMemory.storage_type(), StorageType::InMemory);
        assert_eq!(
            StorageConfig::Postgres(PostgresConfig::new("postgres://db")).storage_type(),
            StorageType::Postgres
        );
    }

    #[tokio::test]
    async fn test_create_in_memory_registry() {
        let registry = StorageFactory::create(&StorageConfig::InMemory).await.unwrap();
        assert_eq!(registry.keys.count().await.unwrap(), 0);
    }
}
