//! Middleware components for HTTP request processing.
//!
//! This module provides the failure-interception layer that feeds the error
//! responder, client address extraction from proxy headers, and security
//! response headers.

pub mod failure;
pub mod ip;
pub mod security_headers;
