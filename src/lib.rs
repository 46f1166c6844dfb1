//! CPF/CNPJ Validation API
//!
//! HTTP service that validates Brazilian taxpayer documents:
//! - CPF and CNPJ check digit validation and formatting
//! - Per-key daily request quotas enforced atomically
//! - Admin endpoints to issue, list, update and revoke API keys
//! - In-memory or PostgreSQL key registry

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use api::state::AppState;
use config::AdminSecret;
use infrastructure::storage::StorageFactory;
use tracing::info;

/// Environment variable accepted as fallback for `storage.database_url`
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Build the application state from configuration
pub async fn create_app_state(
    config: &AppConfig,
    admin_secret: AdminSecret,
) -> anyhow::Result<AppState> {
    let storage_config = config
        .storage
        .resolve(std::env::var(DATABASE_URL_ENV).ok())?;

    info!(backend = ?storage_config.storage_type(), "Initializing key registry");

    let registry = StorageFactory::create(&storage_config).await?;

    Ok(AppState::new(registry, admin_secret))
}
