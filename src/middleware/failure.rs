use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::header::USER_AGENT,
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::middleware::ip::extract_client_ip;
use crate::responder::RequestContext;
use crate::state::AppState;

/// Intercepts failures produced anywhere in request handling.
///
/// `AppError::into_response` parks the failure in the response extensions;
/// this layer picks it up together with the request context captured up
/// front and hands both to the responder, which produces the final envelope.
/// Responses without a failure extension pass through untouched.
pub async fn failure_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    // Captured before the inner service consumes the request.
    let method = req.method().clone();
    let uri = req.uri().clone();
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let fallback = req.extensions().get::<ConnectInfo<SocketAddr>>().map(|ci| ci.0.ip());
    let client_ip = extract_client_ip(req.headers(), fallback);

    let mut res = next.run(req).await;

    if let Some(failure) = res.extensions_mut().remove::<Arc<AppError>>() {
        let ctx = RequestContext { method, uri, user_agent, client_ip };
        return state.responder.respond(&failure, ctx).await;
    }
    res
}
