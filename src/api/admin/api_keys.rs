//! API key management admin endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Query};
use crate::domain::api_key::{ApiKeyRecord, DEFAULT_DAILY_LIMIT, DEFAULT_PLAN};
use crate::infrastructure::api_key::UpdateApiKeyRequest;

/// Query of `POST /admin/create-key`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateKeyQuery {
    pub plan: Option<String>,
    pub daily_limit: Option<i64>,
}

/// Query of `DELETE /admin/delete-key`
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteKeyQuery {
    pub key_prefix: String,
}

/// Query of `PATCH /admin/update-limit`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLimitQuery {
    pub key_prefix: String,
    pub plan: Option<String>,
    pub daily_limit: Option<i64>,
}

/// A freshly issued key. The only response that carries a full key.
#[derive(Debug, Serialize)]
pub struct CreatedKeyResponse {
    pub api_key: String,
    pub plan: String,
    pub daily_limit: u32,
}

/// Listing entry with the key masked
#[derive(Debug, Serialize)]
pub struct KeySummary {
    pub key: String,
    pub plan: String,
    pub daily_limit: u32,
}

impl From<&ApiKeyRecord> for KeySummary {
    fn from(record: &ApiKeyRecord) -> Self {
        Self {
            key: record.masked_key(),
            plan: record.plan().to_string(),
            daily_limit: record.daily_limit(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KeyListResponse {
    pub total: usize,
    pub keys: Vec<KeySummary>,
}

#[derive(Debug, Serialize)]
pub struct DeletedKeyResponse {
    pub deleted: bool,
    pub key_prefix: String,
}

#[derive(Debug, Serialize)]
pub struct UpdatedKeyResponse {
    pub updated: bool,
    pub key_prefix: String,
    pub plan: String,
    pub daily_limit: u32,
}

/// `POST /admin/create-key`
pub async fn create_key(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<CreateKeyQuery>,
) -> Result<Json<CreatedKeyResponse>, ApiError> {
    let plan = query.plan.as_deref().unwrap_or(DEFAULT_PLAN);
    let daily_limit = query.daily_limit.unwrap_or(i64::from(DEFAULT_DAILY_LIMIT));

    let record = state.api_key_service.create(plan, daily_limit).await?;

    Ok(Json(CreatedKeyResponse {
        api_key: record.key().to_string(),
        plan: record.plan().to_string(),
        daily_limit: record.daily_limit(),
    }))
}

/// `GET /me/keys` - every key, newest first
pub async fn list_keys(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<KeyListResponse>, ApiError> {
    let keys: Vec<KeySummary> = state
        .api_key_service
        .list()
        .await?
        .iter()
        .map(KeySummary::from)
        .collect();

    debug!(total = keys.len(), "Listed API keys");

    Ok(Json(KeyListResponse {
        total: keys.len(),
        keys,
    }))
}

/// `DELETE /admin/delete-key`
pub async fn delete_key(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<DeleteKeyQuery>,
) -> Result<Json<DeletedKeyResponse>, ApiError> {
    state.api_key_service.delete_by_prefix(&query.key_prefix).await?;

    Ok(Json(DeletedKeyResponse {
        deleted: true,
        key_prefix: query.key_prefix,
    }))
}

/// `PATCH /admin/update-limit`
pub async fn update_limit(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<UpdateLimitQuery>,
) -> Result<Json<UpdatedKeyResponse>, ApiError> {
    let request = UpdateApiKeyRequest {
        plan: query.plan,
        daily_limit: query.daily_limit,
    };

    let updated = state
        .api_key_service
        .update_by_prefix(&query.key_prefix, request)
        .await?;

    Ok(Json(UpdatedKeyResponse {
        updated: true,
        key_prefix: query.key_prefix,
        plan: updated.plan().to_string(),
        daily_limit: updated.daily_limit(),
    }))
}
