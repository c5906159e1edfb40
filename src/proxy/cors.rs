//! Permissive cross-origin headers.
//!
//! Every response leaving the proxy carries `Access-Control-Allow-Origin: *`
//! together with the allowed methods and headers. Preflight requests are
//! answered locally.

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::Response,
};

use crate::errors::ProxyError;
use crate::proxy_config::CorsSection;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// Header values computed once from configuration.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_headers: HeaderValue,
    max_age: HeaderValue,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allow_headers: HeaderValue::from_static("Content-Type"),
            max_age: HeaderValue::from(86_400u64),
        }
    }
}

impl CorsPolicy {
    pub fn from_config(section: &CorsSection) -> Result<Self, ProxyError> {
        let allow_headers = HeaderValue::from_str(section.allow_headers.trim()).map_err(|_| {
            ProxyError::InvalidConfig(format!(
                "cors.allow_headers '{}' is not a valid header value",
                section.allow_headers
            ))
        })?;
        Ok(Self {
            allow_headers,
            max_age: HeaderValue::from(section.max_age),
        })
    }

    /// Insert or overwrite the CORS headers on an outgoing header map.
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            self.allow_headers.clone(),
        );
    }

    /// `204 No Content` answer to an `OPTIONS` request.
    pub fn preflight(&self) -> Response {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        let headers = response.headers_mut();
        self.apply(headers);
        headers.insert(header::ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
        response
    }
}
