//! HTTP route handlers.
//!
//! - `health`: health check, readiness, version and metrics endpoints

use axum::http::Uri;

use crate::error::AppError;

pub mod health;

/// Fallback for unknown routes. The resulting failure flows through the
/// responder like any other.
pub async fn fallback(uri: Uri) -> AppError {
    AppError::not_found(format!("no route for {}", uri.path()))
}
