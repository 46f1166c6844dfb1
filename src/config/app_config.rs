use serde::Deserialize;
use thiserror::Error;

use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::storage::{PostgresConfig, StorageConfig, StorageType};

/// Environment variable holding the admin secret
pub const ADMIN_KEY_ENV: &str = "ADMIN_KEY";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Key registry backend settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `memory` or `postgres`
    pub backend: String,
    /// Falls back to the `DATABASE_URL` environment variable
    pub database_url: Option<String>,
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: None,
            max_connections: default_max_connections(),
        }
    }
}

/// Errors raised while assembling configuration at startup
#[derive(Debug, Error)]
pub enum StartupConfigError {
    #[error("{0} is not set in the environment")]
    MissingAdminKey(&'static str),

    #[error("Unknown storage backend '{0}', expected 'memory' or 'postgres'")]
    UnknownBackend(String),

    #[error("PostgreSQL storage requires storage.database_url or DATABASE_URL")]
    MissingDatabaseUrl,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl StorageSettings {
    /// Resolve into a storage configuration, consulting `database_url`
    /// (usually `DATABASE_URL`) when none is configured.
    pub fn resolve(
        &self,
        database_url: Option<String>,
    ) -> Result<StorageConfig, StartupConfigError> {
        let backend = StorageType::from_str(&self.backend)
            .ok_or_else(|| StartupConfigError::UnknownBackend(self.backend.clone()))?;

        match backend {
            StorageType::InMemory => Ok(StorageConfig::InMemory),
            StorageType::Postgres => {
                let url = self
                    .database_url
                    .clone()
                    .or(database_url)
                    .filter(|u| !u.trim().is_empty())
                    .ok_or(StartupConfigError::MissingDatabaseUrl)?;

                Ok(StorageConfig::Postgres(
                    PostgresConfig::new(url).with_max_connections(self.max_connections),
                ))
            }
        }
    }
}

/// Secret required on admin routes
#[derive(Clone)]
pub struct AdminSecret(String);

impl AdminSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Read the secret from `ADMIN_KEY`; absent or blank is an error
    pub fn from_env() -> Result<Self, StartupConfigError> {
        Self::from_value(std::env::var(ADMIN_KEY_ENV).ok())
    }

    fn from_value(value: Option<String>) -> Result<Self, StartupConfigError> {
        value
            .filter(|v| !v.trim().is_empty())
            .map(Self)
            .ok_or(StartupConfigError::MissingAdminKey(ADMIN_KEY_ENV))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminSecret([REDACTED])")
    }
}
