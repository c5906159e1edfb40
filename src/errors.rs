//! Typed errors for the edge proxy.
//!
//! `ProxyError` covers every way a single proxied request can fail before a
//! backend response is available. Each variant maps to exactly one HTTP
//! status; rendering into a response lives in `proxy::api`.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors from handling one proxied request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Network-level failure talking to the backend (DNS, refused, reset, TLS).
    ///
    /// Built from a URL-free `reqwest::Error`; the message spells out the
    /// whole cause chain since it is what the caller gets to see.
    #[error("{}", error_chain(.0))]
    Upstream(reqwest::Error),

    #[error("Request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("Failed to read request body: {0}")]
    BodyRead(String),

    #[error("No route for {path}")]
    NoRoute { path: String },

    #[error("Invalid proxy configuration: {0}")]
    InvalidConfig(String),
}

impl ProxyError {
    /// Status code for this error. `failure_status` is the configured code
    /// used when the backend is unreachable.
    pub fn status(&self, failure_status: StatusCode) -> StatusCode {
        match self {
            ProxyError::Upstream(_) => failure_status,
            ProxyError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::BodyRead(_) => StatusCode::BAD_REQUEST,
            ProxyError::NoRoute { .. } => StatusCode::NOT_FOUND,
            ProxyError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the error belongs in the failure envelope with a timestamp.
    pub fn is_upstream(&self) -> bool {
        matches!(self, ProxyError::Upstream(_))
    }
}

/// `err` followed by each of its causes, joined with `": "`.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.ends_with(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("error sending request")]
    struct Outer(#[source] Inner);

    #[derive(Debug, Error)]
    #[error("tcp connect error")]
    struct Inner(#[source] std::io::Error);

    #[test]
    fn error_chain_includes_every_cause() {
        let err = Outer(Inner(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        )));
        assert_eq!(
            error_chain(&err),
            "error sending request: tcp connect error: connection refused"
        );
    }

    #[test]
    fn error_chain_without_source_is_display() {
        let err = ProxyError::BodyTooLarge { limit: 8 };
        assert_eq!(error_chain(&err), err.to_string());
    }

    #[test]
    fn body_too_large_carries_limit() {
        let err = ProxyError::BodyTooLarge { limit: 1024 };
        assert!(err.to_string().contains("1024"));
        assert_eq!(
            err.status(StatusCode::BAD_GATEWAY),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn no_route_is_not_found() {
        let err = ProxyError::NoRoute {
            path: "/nope".to_string(),
        };
        assert_eq!(err.status(StatusCode::BAD_GATEWAY), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("/nope"));
        assert!(!err.is_upstream());
    }

    #[test]
    fn non_upstream_statuses_ignore_failure_status() {
        let errors = [
            ProxyError::BodyRead("eof".into()),
            ProxyError::InvalidConfig("bad".into()),
        ];
        for err in &errors {
            assert_eq!(
                err.status(StatusCode::BAD_GATEWAY),
                err.status(StatusCode::INTERNAL_SERVER_ERROR)
            );
        }
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&ProxyError::BodyTooLarge { limit: 1 });
    }
}
