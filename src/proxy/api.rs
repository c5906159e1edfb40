use std::sync::Arc;

use axum::{
    Json,
    body::{Body, Bytes},
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use tracing::{error, warn};

use super::cors::CorsPolicy;
use super::forward::{Forwarder, forwardable_headers, method_carries_body};
use super::route::ProxyRoute;
use crate::errors::ProxyError;
use crate::proxy_config::{EdgeToml, FailureSection};

// ── Shared application state ──────────────────────────────────────────

/// Immutable per-process state shared by every request.
#[derive(Debug, Clone)]
pub struct ProxyState {
    pub route: ProxyRoute,
    pub cors: CorsPolicy,
    pub forwarder: Forwarder,
    pub failure_status: StatusCode,
    pub include_timestamp: bool,
    pub max_body_bytes: usize,
}

pub type SharedState = Arc<ProxyState>;

impl ProxyState {
    /// Build state from configuration, using `client` for outbound calls.
    pub fn from_config(config: &EdgeToml, client: reqwest::Client) -> Result<Self, ProxyError> {
        let route = ProxyRoute::new(
            &config.proxy.mount,
            &config.backend.base_url,
            &config.backend.path_prefix,
        )?;
        let cors = CorsPolicy::from_config(&config.cors)?;
        let failure_status = failure_status(&config.failure)?;

        Ok(Self {
            route,
            cors,
            forwarder: Forwarder::new(client),
            failure_status,
            include_timestamp: config.failure.include_timestamp,
            max_body_bytes: config.proxy.max_body_bytes,
        })
    }

    /// JSON error envelope for `err` under the configured failure policy.
    pub fn error_response(&self, err: &ProxyError) -> Response {
        envelope(err, self.failure_status, self.include_timestamp, &self.cors)
    }
}

/// `{"error": ...}` plus, for backend failures, an optional `timestamp`.
/// Always CORS-annotated.
fn envelope(
    err: &ProxyError,
    failure_status: StatusCode,
    include_timestamp: bool,
    cors: &CorsPolicy,
) -> Response {
    let mut body = serde_json::json!({ "error": err.to_string() });
    if err.is_upstream() && include_timestamp {
        body["timestamp"] = serde_json::Value::String(iso_timestamp());
    }
    let mut response = (err.status(failure_status), Json(body)).into_response();
    cors.apply(response.headers_mut());
    response
}

fn failure_status(section: &FailureSection) -> Result<StatusCode, ProxyError> {
    StatusCode::from_u16(section.status)
        .ok()
        .filter(StatusCode::is_server_error)
        .ok_or_else(|| {
            ProxyError::InvalidConfig(format!(
                "failure.status must be a 5xx code, got {}",
                section.status
            ))
        })
}

/// UTC timestamp in the `2024-05-01T12:00:00.000Z` form.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ── Error handling ────────────────────────────────────────────────────

/// Policy-free fallback for code paths without a `ProxyState`: the
/// envelope as a default `edge.toml` would produce it (502, timestamp on,
/// default CORS). The proxy handler goes through `ProxyState::error_response`.
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let defaults = FailureSection::default();
        let status = failure_status(&defaults).unwrap_or(StatusCode::BAD_GATEWAY);
        envelope(
            &self,
            status,
            defaults.include_timestamp,
            &CorsPolicy::default(),
        )
    }
}

// ── Handlers ──────────────────────────────────────────────────────────

pub async fn health_check() -> &'static str {
    "ok"
}

/// Forward anything under the mount to the backend.
pub async fn proxy_handler(State(state): State<SharedState>, request: Request) -> Response {
    if request.method() == Method::OPTIONS {
        return state.cors.preflight();
    }

    match proxy_request(&state, request).await {
        Ok(mut response) => {
            state.cors.apply(response.headers_mut());
            response
        }
        Err(err) => {
            if !err.is_upstream() {
                warn!(error = %err, "Rejected request");
            }
            state.error_response(&err)
        }
    }
}

async fn proxy_request(state: &ProxyState, request: Request) -> Result<Response, ProxyError> {
    let url = state
        .route
        .backend_url(request.uri())
        .ok_or_else(|| ProxyError::NoRoute {
            path: request.uri().path().to_string(),
        })?;

    let (parts, body) = request.into_parts();
    let headers = forwardable_headers(&parts.headers);
    let body = if method_carries_body(&parts.method) {
        Some(read_body(body, state.max_body_bytes).await?)
    } else {
        None
    };

    state
        .forwarder
        .forward(parts.method, &url, headers, body)
        .await
        .inspect_err(|err| error!(url = %url, error = %err, "Proxy error"))
}

async fn read_body(body: Body, limit: usize) -> Result<Bytes, ProxyError> {
    axum::body::to_bytes(body, limit).await.map_err(|e| {
        if is_length_limit(&e) {
            ProxyError::BodyTooLarge { limit }
        } else {
            ProxyError::BodyRead(e.to_string())
        }
    })
}

fn is_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<http_body_util::LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}
