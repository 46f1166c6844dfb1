//! Service status endpoints

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::state::AppState;

const SERVICE_MESSAGE: &str = "API de validação de CPF e CNPJ";

/// Body of the root status endpoint
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Readiness response with component status
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    pub checks: Vec<HealthCheck>,
    pub latency_ms: u64,
}

/// Health check status
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Individual component health check
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: &'static str,
    pub status: HealthStatus,
    pub latency_ms: u64,
}

/// `GET /` - the service is up
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        status: "ok",
        message: SERVICE_MESSAGE,
    })
}

/// `GET /ready` - the key registry answers queries
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let registry = check_key_registry(&state).await;
    let status = registry.status;

    let response = ReadyResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        checks: vec![registry],
        latency_ms: start.elapsed().as_millis() as u64,
    };

    let status_code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

async fn check_key_registry(state: &AppState) -> HealthCheck {
    let start = Instant::now();

    let status = match state.api_key_service.count().await {
        Ok(_) => HealthStatus::Healthy,
        Err(e) => {
            tracing::warn!(error = %e, "Key registry readiness check failed");
            HealthStatus::Unhealthy
        }
    };

    HealthCheck {
        name: "key_registry",
        status,
        latency_ms: start.elapsed().as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::AdminSecret;
    use crate::domain::api_key::MockApiKeyRepository;
    use crate::domain::usage::MockUsageRepository;
    use crate::domain::DomainError;
    use crate::infrastructure::storage::KeyRegistry;

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
    }

    #[tokio::test]
    async fn test_home_message() {
        let Json(body) = home().await;

        assert_eq!(body.status, "ok");
        assert_eq!(body.message, "API de validação de CPF e CNPJ");
    }

    #[tokio::test]
    async fn test_ready_with_in_memory_registry() {
        let state = AppState::new(KeyRegistry::in_memory(), AdminSecret::new("admin"));
        let response = ready_check(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_reports_unavailable_registry() {
        let mut keys = MockApiKeyRepository::new();
        keys.expect_count()
            .returning(|| Err(DomainError::storage("connection refused")));

        let registry = KeyRegistry {
            keys: Arc::new(keys),
            usage: Arc::new(MockUsageRepository::new()),
        };
        let state = AppState::new(registry, AdminSecret::new("admin"));

        let response = ready_check(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
