//! Integration and unit tests for the Grundgeruest application.
//!
//! ## Test Modules
//!
//! - **error_tests**: Failure type derivation and conversion tests
//! - **responder_tests**: Error responder contract tests (shaping, sinks, redaction)
//! - **config_tests**: Configuration loading and validation tests
//! - **api_tests**: Failure flow through the full router
//! - **health_api_tests**: Operational endpoint tests

pub mod responder_tests;
