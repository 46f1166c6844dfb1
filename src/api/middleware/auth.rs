//! API key authentication and quota admission

use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::infrastructure::observability::record_quota_rejection;
use crate::infrastructure::usage::{AdmittedKey, GateError};

/// Header carrying the client API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extractor that admits a request through the quota gate.
///
/// Reads the key from the `X-API-Key` header and consumes one unit of the
/// key's quota for the current local day. Rejects with 401 for a missing or
/// unknown key and 429 once the day's limit is reached.
#[derive(Debug, Clone)]
pub struct RequireApiKey(pub AdmittedKey);

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = extract_api_key(&parts.headers);
        let today = chrono::Local::now().date_naive();

        match state.quota_gate.admit(presented, today).await {
            Ok(admitted) => {
                debug!(
                    key = %admitted.record.masked_key(),
                    used = admitted.usage.count,
                    "Request admitted"
                );
                Ok(RequireApiKey(admitted))
            }
            Err(err) => {
                match &err {
                    GateError::Unauthenticated => record_quota_rejection("unauthenticated"),
                    GateError::QuotaExceeded { .. } => record_quota_rejection("exhausted"),
                    GateError::Storage(_) => {}
                }

                Err(err.into())
            }
        }
    }
}

/// Header values that are not valid visible ASCII count as absent
fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
}
