use std::error::Error;
use std::fmt;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// The primary error type for the application.
///
/// Every handled request failure is one of these, regardless of origin. A
/// failure carries an optional declared status code, an optional message, an
/// `operational` marker for anticipated failures and an optional source error
/// used for diagnostics. Derivation of the final status, message and response
/// body is the responder's job, not this type's.
#[derive(Debug)]
pub struct AppError {
    status: Option<StatusCode>,
    message: Option<String>,
    operational: bool,
    source: Option<anyhow::Error>,
}

impl AppError {
    /// A failure with a caller-declared status code and message.
    ///
    /// Invalid status integers are dropped here; derivation then falls back
    /// to 500.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).ok(),
            message: Some(message.into()),
            operational: true,
            source: None,
        }
    }

    /// An unexpected internal failure. Not operational; the source error is
    /// kept for the development stack rendering.
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self { status: None, message: None, operational: false, source: Some(err.into()) }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::CONFLICT, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status: Some(status), message: Some(message.into()), operational: true, source: None }
    }

    /// Attach the underlying error for diagnostics.
    pub fn with_source(mut self, err: impl Into<anyhow::Error>) -> Self {
        self.source = Some(err.into());
        self
    }

    /// The effective HTTP status: the declared one when present and valid,
    /// 500 otherwise.
    pub fn status_code(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// The raw caller-supplied message, if any. May be empty or whitespace;
    /// the responder substitutes the generic message in that case.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether the failure was anticipated by the caller. Recorded in the
    /// diagnostic output but not consumed when shaping the response.
    pub fn is_operational(&self) -> bool {
        self.operational
    }

    /// Diagnostic rendering of the source error chain (and backtrace, when
    /// captured).
    pub fn stack(&self) -> Option<String> {
        self.source.as_ref().map(|e| format!("{:?}", e))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, &self.source) {
            (Some(msg), _) => write!(f, "{} ({})", msg, self.status_code()),
            (None, Some(err)) => write!(f, "{} ({})", err, self.status_code()),
            (None, None) => write!(f, "request failed ({})", self.status_code()),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.source {
            Some(e) => Some(e.as_ref()),
            None => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // The failure travels in the response extensions until the failure
        // middleware picks it up and produces the final envelope. The interim
        // response carries only the status.
        let mut res = self.status_code().into_response();
        res.extensions_mut().insert(Arc::new(self));
        res
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::internal(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::internal(err)
    }
}

/// A type alias for `Result<T, AppError>`, used by request handlers.
pub type AppResult<T> = Result<T, AppError>;
