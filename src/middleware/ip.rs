use axum::http::HeaderMap;
use std::net::IpAddr;

/// Extract the client IP from proxy headers and optional transport metadata.
///
/// Best-effort: `X-Forwarded-For` (first hop) wins, then `X-Real-IP`, then
/// the transport address. `None` when nothing usable is known.
pub fn extract_client_ip(headers: &HeaderMap, fallback: Option<IpAddr>) -> Option<IpAddr> {
    if let Some(h) = headers.get("x-forwarded-for").and_then(|hv| hv.to_str().ok()) {
        if let Some(first) = h.split(',').next() {
            if let Ok(ip) = first.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    if let Some(h) = headers.get("x-real-ip").and_then(|hv| hv.to_str().ok()) {
        if let Ok(ip) = h.parse::<IpAddr>() {
            return Some(ip);
        }
    }
    fallback
}
