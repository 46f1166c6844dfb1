//! Endpoints about the calling key

use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;

use crate::api::middleware::RequireApiKey;

/// Today's usage for the calling key
#[derive(Debug, Serialize)]
pub struct UsageResponse {
    pub plan: String,
    pub day: NaiveDate,
    pub used: u32,
    pub daily_limit: u32,
    pub remaining: u32,
}

/// `GET /me/usage`. Passing the gate counts as a use, so `used` includes
/// this request.
pub async fn my_usage(RequireApiKey(admitted): RequireApiKey) -> Json<UsageResponse> {
    let remaining = admitted.remaining();

    Json(UsageResponse {
        plan: admitted.record.plan().to_string(),
        day: admitted.usage.day,
        used: admitted.usage.count,
        daily_limit: admitted.record.daily_limit(),
        remaining,
    })
}
