//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;

const MAX_PATH_LABEL_LEN: usize = 50;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("cpf_cnpj_api_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router serving at `path`
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path_label(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record the outcome of a document validation
pub fn record_validation(document_type: &str, valid: bool) {
    counter!(
        "document_validations_total",
        "type" => document_type.to_string(),
        "valid" => valid.to_string()
    )
    .increment(1);
}

/// Record a request turned away by the quota gate
pub fn record_quota_rejection(reason: &'static str) {
    counter!("quota_rejections_total", "reason" => reason).increment(1);
}

/// Path labels come from matched route templates; cap them anyway so an
/// unmatched path cannot blow up label cardinality.
fn path_label(path: &str) -> String {
    if path.len() > MAX_PATH_LABEL_LEN {
        let mut end = MAX_PATH_LABEL_LEN;

        while !path.is_char_boundary(end) {
            end -= 1;
        }

        path[..end].to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_label_short_path() {
        assert_eq!(path_label("/validate/cpf"), "/validate/cpf");
    }

    #[test]
    fn test_path_label_truncates_long_paths() {
        let path = "/very/long/path/that/exceeds/the/maximum/allowed/length/for/metrics";
        assert_eq!(path_label(path).len(), MAX_PATH_LABEL_LEN);
    }

    #[test]
    fn test_path_label_respects_char_boundaries() {
        let path = format!("/{}", "ç".repeat(40));
        let label = path_label(&path);

        assert!(label.len() <= MAX_PATH_LABEL_LEN);
        assert!(path.starts_with(&label));
    }

    #[test]
    fn test_disabled_metrics_are_not_installed() {
        let config = MetricsConfig {
            enabled: false,
            path: "/metrics".to_string(),
        };

        assert!(init_metrics(&config).is_none());
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_http_request("GET", "/validate/cpf", 200, Duration::from_millis(3));
        record_validation("CPF", true);
        record_quota_rejection("exhausted");
    }
}
