//! # Grundgeruest
//!
//! A small web-service scaffold with centralized error reporting. Every
//! handled request failure is turned into a structured record, written to
//! the diagnostic stream (and, in production, to an append-only failure
//! log), and answered with a JSON error envelope shaped by the deployment
//! environment.
//!
//! ## Architecture
//!
//! The application is built using:
//! - **Axum**: HTTP server, routing and middleware
//! - **Tokio**: Async runtime
//! - **Tracing**: Structured diagnostics with stdout and rolling-file output
//! - **Serde**: Serialization for the JSON API and failure records
//!
//! ## Core Components
//!
//! - [`config`]: Layered configuration and the deployment environment flag
//! - [`error`]: The application failure type flowing through handlers
//! - [`responder`]: Failure records, record sinks and response shaping
//! - [`middleware`]: Failure interception, client IP extraction, security headers
//! - [`routes`]: Operational HTTP endpoints
//! - [`router`]: Router assembly and layering
//! - [`metrics`]: Operational counters
//! - [`state`]: Shared application state

pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod responder;
pub mod router;
pub mod routes;
pub mod state;

#[cfg(test)]
mod tests;
