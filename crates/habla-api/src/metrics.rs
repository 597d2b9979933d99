//! Prometheus metrics for monitoring API performance and learner activity.

use std::{sync::LazyLock, time::Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use regex::Regex;

static UUID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("valid uuid regex")
});
static NUMERIC_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+(/|$)").expect("valid numeric regex"));

/// Install the Prometheus recorder.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )?
        .install_recorder()?;

    Ok(handle)
}

/// Middleware to record HTTP request metrics
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(duration);

    response
}

/// Replace UUIDs and numeric segments with `:id` to keep label cardinality low.
pub fn normalize_path(path: &str) -> String {
    let normalized = UUID_SEGMENT.replace_all(path, ":id");
    // Run twice: adjacent numeric segments share the separating slash.
    let normalized = NUMERIC_SEGMENT.replace_all(&normalized, "/:id$1");
    NUMERIC_SEGMENT.replace_all(&normalized, "/:id$1").into_owned()
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

/// Count an answer check by outcome.
pub fn record_grading_verdict(correct: bool) {
    let result = if correct { "correct" } else { "incorrect" };
    counter!("grading_verdicts_total", "result" => result).increment(1);
}

/// Count a session lifecycle event: `started`, `completed` or `restarted`.
pub fn record_session_event(event: &'static str) {
    counter!("lesson_sessions_total", "event" => event).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path("/lessons/550e8400-e29b-41d4-a716-446655440000"),
            "/lessons/:id"
        );
        assert_eq!(
            normalize_path("/sessions/550e8400-e29b-41d4-a716-446655440000/answers/3/check"),
            "/sessions/:id/answers/:id/check"
        );
        assert_eq!(normalize_path("/sessions/1/answers/2"), "/sessions/:id/answers/:id");
        assert_eq!(normalize_path("/lessons/12/34"), "/lessons/:id/:id");
        assert_eq!(normalize_path("/health"), "/health");
    }
}
