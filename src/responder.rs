//! Centralized error reporting and response shaping.
//!
//! Every handled request failure terminates here: the responder derives the
//! status and message, writes a [`FailureRecord`] to the diagnostic stream,
//! appends it to the durable failure log when running in production, and
//! produces the JSON error envelope. Sink failures degrade observability,
//! never the response.

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    http::{Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::config::Environment;
use crate::error::AppError;
use crate::metrics::Metrics;

/// Client-facing message used whenever the original one is absent, empty or
/// redacted in production.
pub const GENERIC_MESSAGE: &str = "Something went wrong";

/// Identifying details of the request that triggered a failure, captured by
/// the failure middleware before the request is consumed.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub uri: Uri,
    pub user_agent: Option<String>,
    pub client_ip: Option<IpAddr>,
}

/// Structured representation of one handled request failure.
///
/// Constructed when the failure is observed, serialized to the configured
/// sinks and never retained afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Correlation id, also emitted on the diagnostic stream.
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub method: String,
    pub url: String,
    pub status_code: u16,
    pub message: String,
    /// Source-error chain; only populated in the development environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<IpAddr>,
}

/// Destination for durable failure records.
///
/// Implementations must be safe to call from concurrent requests; there is no
/// cross-request locking in the responder.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn record(&self, record: &FailureRecord) -> anyhow::Result<()>;
}

/// Appends one JSON object per line to a fixed file path.
///
/// The file is opened per call in append mode and the whole line is written
/// in a single write, so concurrent appends stay intact at the payload sizes
/// involved.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSink for FileSink {
    async fn record(&self, record: &FailureRecord) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}

/// In-memory sink, intended as a test substitute for [`FileSink`].
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<FailureRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<FailureRecord> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn record(&self, record: &FailureRecord) -> anyhow::Result<()> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).push(record.clone());
        Ok(())
    }
}

/// The terminal failure handler.
///
/// Holds the deployment environment and the optional durable sink; shared
/// immutably across requests. Nothing escalates past `respond` - a failure
/// while persisting the record is swallowed and only reported on the
/// diagnostic stream.
pub struct ErrorResponder {
    env: Environment,
    sink: Option<Arc<dyn RecordSink>>,
    metrics: Metrics,
}

impl ErrorResponder {
    pub fn new(env: Environment, metrics: Metrics) -> Self {
        Self { env, sink: None, metrics }
    }

    /// Attach the durable sink. It is only consulted in production.
    pub fn with_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Handle one failure: build the record, emit it, and shape the response.
    pub async fn respond(&self, failure: &AppError, ctx: RequestContext) -> Response {
        let status = failure.status_code();
        let message = match failure.message() {
            Some(m) if !m.trim().is_empty() => m.to_string(),
            _ => GENERIC_MESSAGE.to_string(),
        };
        let stack = if self.env.is_development() { failure.stack() } else { None };

        let record = FailureRecord {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            method: ctx.method.to_string(),
            url: ctx.uri.to_string(),
            status_code: status.as_u16(),
            message,
            stack,
            user_agent: ctx.user_agent,
            client_ip: ctx.client_ip,
        };

        self.metrics.inc_failures_handled();
        tracing::error!(
            error_id = %record.id,
            method = %record.method,
            url = %record.url,
            status = record.status_code,
            operational = failure.is_operational(),
            "{}",
            record.message
        );

        if self.env.is_production() {
            if let Some(sink) = &self.sink {
                if let Err(e) = sink.record(&record).await {
                    self.metrics.inc_record_write_failures();
                    tracing::error!(error_id = %record.id, "failed to persist failure record: {:#}", e);
                }
            }
        }

        let shown = if self.env.is_production() { GENERIC_MESSAGE } else { record.message.as_str() };
        let mut body = json!({
            "success": false,
            "message": shown,
        });
        if let Some(stack) = &record.stack {
            body["stack"] = json!(stack);
        }

        (status, Json(body)).into_response()
    }
}

impl std::fmt::Debug for ErrorResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorResponder")
            .field("env", &self.env)
            .field("sink", &self.sink.as_ref().map(|_| "RecordSink"))
            .finish()
    }
}
