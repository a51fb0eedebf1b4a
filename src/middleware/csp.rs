use axum::http::{header::CONTENT_SECURITY_POLICY, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

/// Layer stamping every response with the configured policy. `None` when the
/// policy is empty (header disabled) or not a valid header value.
pub fn content_security_policy(policy: &str) -> Option<SetResponseHeaderLayer<HeaderValue>> {
    if policy.trim().is_empty() {
        return None;
    }

    match HeaderValue::from_str(policy) {
        Ok(value) => Some(SetResponseHeaderLayer::overriding(CONTENT_SECURITY_POLICY, value)),
        Err(e) => {
            tracing::warn!("Ignoring invalid Content-Security-Policy value: {}", e);
            None
        }
    }
}
