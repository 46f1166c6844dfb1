use axum::{middleware, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::account;
use super::admin;
use super::health;
use super::middleware::{logging_middleware, metrics_middleware, security_headers_middleware};
use super::state::AppState;
use super::validation;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::home))
        .route("/ready", get(health::ready_check))
        .route("/validate/cpf", get(validation::validate_cpf_handler))
        .route("/validate/cnpj", get(validation::validate_cnpj_handler))
        .route("/validate/document", get(validation::validate_document_handler))
        .route("/me/usage", get(account::my_usage))
        .merge(admin::create_admin_router())
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Full router plus the Prometheus scrape endpoint at `path`
pub fn create_router_with_metrics(
    state: AppState,
    metrics: PrometheusMetrics,
    path: &str,
) -> Router {
    create_router(state).merge(create_metrics_router(metrics, path))
}
