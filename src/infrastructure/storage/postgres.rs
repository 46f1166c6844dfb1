//! PostgreSQL key registry with connection pooling

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::domain::api_key::{ApiKeyRecord, ApiKeyRepository};
use crate::domain::usage::{ConsumeOutcome, UsageRepository};
use crate::domain::DomainError;

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            connect_timeout_secs: 30,
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Open a connection pool
    pub async fn connect(&self) -> Result<PgPool, DomainError> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.connect_timeout_secs))
            .connect(&self.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
    }
}

/// Key registry stored in the `api_keys` and `usage_daily` tables
#[derive(Debug, Clone)]
pub struct PostgresKeyRegistry {
    pool: PgPool,
}

impl PostgresKeyRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage_error(context: &str) -> impl Fn(sqlx::Error) -> DomainError + '_ {
    move |e| DomainError::storage(format!("{}: {}", context, e))
}

fn row_to_record(row: &PgRow) -> Result<ApiKeyRecord, DomainError> {
    let key: String = row.try_get("key").map_err(storage_error("Invalid key column"))?;
    let plan: String = row.try_get("plan").map_err(storage_error("Invalid plan column"))?;
    let daily_limit: i64 = row
        .try_get("daily_limit")
        .map_err(storage_error("Invalid daily_limit column"))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(storage_error("Invalid created_at column"))?;

    let daily_limit = u32::try_from(daily_limit)
        .map_err(|_| DomainError::storage(format!("Stored daily_limit out of range: {}", daily_limit)))?;

    Ok(ApiKeyRecord::from_parts(key, plan, daily_limit, created_at))
}

fn count_to_u32(count: i64) -> Result<u32, DomainError> {
    u32::try_from(count)
        .map_err(|_| DomainError::storage(format!("Stored usage count out of range: {}", count)))
}

#[async_trait]
impl ApiKeyRepository for PostgresKeyRegistry {
    async fn find_by_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<ApiKeyRecord>, DomainError> {
        let rows = sqlx::query(
            "SELECT key, plan, daily_limit, created_at FROM api_keys \
             WHERE starts_with(key, $1) ORDER BY key LIMIT $2",
        )
        .bind(prefix)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error("Failed to search API keys"))?;

        rows.iter().map(row_to_record).collect()
    }

    async fn create(&self, record: ApiKeyRecord) -> Result<ApiKeyRecord, DomainError> {
        sqlx::query(
            "INSERT INTO api_keys (key, plan, daily_limit, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(record.key())
        .bind(record.plan())
        .bind(i64::from(record.daily_limit()))
        .bind(record.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => DomainError::conflict("API key already exists"),
            _ => DomainError::storage(format!("Failed to create API key: {}", e)),
        })?;

        Ok(record)
    }

    async fn update(&self, record: &ApiKeyRecord) -> Result<ApiKeyRecord, DomainError> {
        let row = sqlx::query(
            "UPDATE api_keys SET plan = $2, daily_limit = $3 WHERE key = $1 \
             RETURNING key, plan, daily_limit, created_at",
        )
        .bind(record.key())
        .bind(record.plan())
        .bind(i64::from(record.daily_limit()))
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("Failed to update API key"))?;

        match row {
            Some(row) => row_to_record(&row),
            None => Err(DomainError::not_found(format!(
                "API key '{}' not found",
                record.masked_key()
            ))),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        // usage_daily rows go with the key through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM api_keys WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(storage_error("Failed to delete API key"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<ApiKeyRecord>, DomainError> {
        let rows = sqlx::query(
            "SELECT key, plan, daily_limit, created_at FROM api_keys \
             ORDER BY created_at DESC, key",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error("Failed to list API keys"))?;

        rows.iter().map(row_to_record).collect()
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM api_keys")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("Failed to count API keys"))?;

        Ok(count as usize)
    }
}

#[async_trait]
impl UsageRepository for PostgresKeyRegistry {
    async fn try_consume(&self, key: &str, day: NaiveDate) -> Result<ConsumeOutcome, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error("Failed to start transaction"))?;

        // FOR SHARE keeps the limit stable until commit
        let row = sqlx::query(
            "SELECT key, plan, daily_limit, created_at FROM api_keys WHERE key = $1 FOR SHARE",
        )
        .bind(key)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_error("Failed to look up API key"))?;

        let Some(row) = row else {
            return Ok(ConsumeOutcome::UnknownKey);
        };
        let record = row_to_record(&row)?;

        // The conflict branch locks the (key, day) row and re-checks the
        // count on its latest version, so the increment is compare-and-set.
        let incremented: Option<i64> = sqlx::query_scalar(
            "INSERT INTO usage_daily (key, day, count) VALUES ($1, $2, 1) \
             ON CONFLICT (key, day) DO UPDATE SET count = usage_daily.count + 1 \
             WHERE usage_daily.count < $3 \
             RETURNING count",
        )
        .bind(key)
        .bind(day)
        .bind(i64::from(record.daily_limit()))
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_error("Failed to increment usage"))?;

        let outcome = match incremented {
            Some(used) => ConsumeOutcome::Admitted {
                used: count_to_u32(used)?,
                record,
            },
            None => {
                let used: i64 = sqlx::query_scalar(
                    "SELECT count FROM usage_daily WHERE key = $1 AND day = $2",
                )
                .bind(key)
                .bind(day)
                .fetch_one(&mut *tx)
                .await
                .map_err(storage_error("Failed to read usage"))?;

                ConsumeOutcome::Exhausted {
                    used: count_to_u32(used)?,
                    record,
                }
            }
        };

        tx.commit()
            .await
            .map_err(storage_error("Failed to commit usage"))?;

        Ok(outcome)
    }

    async fn count_for_day(&self, key: &str, day: NaiveDate) -> Result<u32, DomainError> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT count FROM usage_daily WHERE key = $1 AND day = $2")
                .bind(key)
                .bind(day)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage_error("Failed to read usage"))?;

        count.map(count_to_u32).transpose().map(|c| c.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PostgresConfig::new("postgres://localhost/keys");

        assert_eq!(config.url, "postgres://localhost/keys");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.connect_timeout_secs, 30);
    }

    #[test]
    fn test_config_builder() {
        let config = PostgresConfig::new("postgres://db").with_max_connections(4);
        assert_eq!(config.max_connections, 4);
    }

    #[test]
    fn test_count_conversion() {
        assert_eq!(count_to_u32(42).unwrap(), 42);
        assert!(count_to_u32(-1).is_err());
    }
}
