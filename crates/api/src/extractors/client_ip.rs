//! Client IP extraction for rate limiting and lead source tracking.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use std::convert::Infallible;

/// Best-effort client address.
///
/// Uses the first `X-Forwarded-For` entry, then `X-Real-IP`, then
/// `"unknown"`. Headers are trusted as set by the fronting proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let real_ip = || {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        ClientIp(
            forwarded
                .or_else(real_ip)
                .unwrap_or("unknown")
                .to_string(),
        )
    }

    pub fn is_known(&self) -> bool {
        self.0 != "unknown"
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_prefers_first_forwarded_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(ClientIp::from_headers(&headers).0, "203.0.113.7");
    }

    #[test]
    fn test_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));
        assert_eq!(ClientIp::from_headers(&headers).0, "198.51.100.4");
    }

    #[test]
    fn test_unknown_without_headers() {
        let ip = ClientIp::from_headers(&HeaderMap::new());
        assert_eq!(ip.0, "unknown");
        assert!(!ip.is_known());
    }
}
