//! Admin authentication
//!
//! Admin routes require the `X-Admin-Key` header to match the secret the
//! service was started with.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::infrastructure::api_key::constant_time_compare;

/// Header carrying the admin secret
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Extractor that requires the admin secret
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if is_admin(&parts.headers, state.admin_secret.expose()) {
            debug!("Admin access granted");
            return Ok(RequireAdmin);
        }

        warn!(path = %parts.uri.path(), "Rejected admin request");
        Err(ApiError::unauthorized("Invalid admin key"))
    }
}

fn is_admin(headers: &HeaderMap, secret: &str) -> bool {
    headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|presented| constant_time_compare(presented, secret))
}
