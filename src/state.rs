use std::sync::Arc;

use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::responder::{ErrorResponder, FileSink};

/// The shared application state.
///
/// Cloneable and thread-safe for use with Axum's request extraction system.
#[derive(Clone)]
pub struct AppState {
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// The terminal failure handler, shared across requests.
    pub responder: Arc<ErrorResponder>,
    /// Operational counters.
    pub metrics: Metrics,
}

impl AppState {
    /// Creates a new `AppState` with a file-backed failure log.
    ///
    /// The responder gets the environment flag injected from the
    /// configuration and a [`FileSink`] pointing at the configured failure
    /// log path. Whether the sink is actually written to is decided per
    /// environment inside the responder.
    pub fn new(config: AppConfig) -> Self {
        let metrics = Metrics::new();
        let sink = FileSink::new(config.logging.error_log_path());
        let responder =
            ErrorResponder::new(config.environment, metrics.clone()).with_sink(Arc::new(sink));

        Self { config: Arc::new(config), responder: Arc::new(responder), metrics }
    }

    /// State with a caller-supplied responder, used by tests to substitute
    /// an in-memory sink. `metrics` must be the instance the responder was
    /// built with, otherwise the snapshots diverge.
    pub fn with_responder(config: AppConfig, responder: ErrorResponder, metrics: Metrics) -> Self {
        Self { config: Arc::new(config), responder: Arc::new(responder), metrics }
    }
}
