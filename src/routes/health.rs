use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

// Health check endpoint - lightweight, no side effects
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Readiness probe: in production, checks that the durable failure log is
// writable; outside production there is nothing to probe.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if !state.config.environment.is_production() {
        return (StatusCode::OK, "ready").into_response();
    }
    match probe_error_log(&state).await {
        Ok(()) => (StatusCode::OK, "ready").into_response(),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, format!("not ready: {}", e)).into_response(),
    }
}

async fn probe_error_log(state: &AppState) -> anyhow::Result<()> {
    let path = state.config.logging.error_log_path();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::OpenOptions::new().create(true).append(true).open(&path).await?;
    Ok(())
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.metrics.get_snapshot();
    Json(snapshot)
}

// Prometheus-compatible text exposition format
pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let m = state.metrics.get_snapshot();
    let body = format!(
        "# HELP grundgeruest_failures_handled Request failures handled\n# TYPE grundgeruest_failures_handled counter\ngrundgeruest_failures_handled {}\n\
# HELP grundgeruest_record_write_failures Failure-log write errors\n# TYPE grundgeruest_record_write_failures counter\ngrundgeruest_record_write_failures {}\n\
# HELP grundgeruest_uptime_seconds Uptime seconds\n# TYPE grundgeruest_uptime_seconds gauge\ngrundgeruest_uptime_seconds {}\n",
        m.failures_handled, m.record_write_failures, m.uptime_seconds,
    );
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

// Version/Build info endpoint (JSON)
pub async fn version() -> impl IntoResponse {
    let body = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}
