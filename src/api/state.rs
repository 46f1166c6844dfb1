//! Application state for shared services

use std::sync::Arc;

use crate::config::AdminSecret;
use crate::infrastructure::api_key::ApiKeyService;
use crate::infrastructure::storage::KeyRegistry;
use crate::infrastructure::usage::QuotaGate;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub api_key_service: Arc<ApiKeyService>,
    pub quota_gate: Arc<QuotaGate>,
    pub admin_secret: AdminSecret,
}

impl AppState {
    /// Wire the services over one key registry
    pub fn new(registry: KeyRegistry, admin_secret: AdminSecret) -> Self {
        Self {
            api_key_service: Arc::new(ApiKeyService::new(registry.keys)),
            quota_gate: Arc::new(QuotaGate::new(registry.usage)),
            admin_secret,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("admin_secret", &self.admin_secret)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_services_share_one_registry() {
        let state = AppState::new(KeyRegistry::in_memory(), AdminSecret::new("admin"));
        let record = state.api_key_service.create("free", 2).await.unwrap();

        let admitted = state
            .quota_gate
            .admit(Some(record.key()), chrono::Local::now().date_naive())
            .await
            .unwrap();

        assert_eq!(admitted.usage.count, 1);
        assert_eq!(admitted.remaining(), 1);
    }
}
