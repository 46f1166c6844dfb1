//! Admin API endpoints for managing API keys

pub mod api_keys;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/admin/create-key", post(api_keys::create_key))
        .route("/admin/delete-key", delete(api_keys::delete_key))
        .route("/admin/update-limit", patch(api_keys::update_limit))
        .route("/me/keys", get(api_keys::list_keys))
}
