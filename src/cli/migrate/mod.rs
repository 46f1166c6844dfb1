//! Migrate command - applies PostgreSQL migrations and exits

use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::storage::{run_storage_migrations, StorageConfig};
use crate::DATABASE_URL_ENV;

/// Apply pending migrations to the configured PostgreSQL database
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging);

    let pg_config = match config.storage.resolve(std::env::var(DATABASE_URL_ENV).ok())? {
        StorageConfig::Postgres(pg) => pg,
        StorageConfig::InMemory => {
            anyhow::bail!("migrate requires storage.backend = \"postgres\"");
        }
    };

    let pool = pg_config.connect().await?;
    let applied = run_storage_migrations(&pool).await?;

    info!(applied, "Migrations complete");

    Ok(())
}
