//! Single-attempt forwarding to the backend.

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderName, Method, header},
    response::Response,
};
use tracing::debug;

use crate::errors::ProxyError;

/// Connection-scoped headers that must not cross the proxy.
const HOP_BY_HOP: [HeaderName; 5] = [
    header::CONNECTION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(name) || name == "keep-alive" || name == "proxy-connection"
}

/// Extra hop-by-hop names announced in `Connection` (`Connection: close, X-Foo`).
fn connection_tokens(headers: &HeaderMap) -> Vec<HeaderName> {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect()
}

/// Copy of `headers` without hop-by-hop fields, `Connection`-listed ones
/// included, and without anything `skip` matches.
fn end_to_end_headers(headers: &HeaderMap, skip: impl Fn(&HeaderName) -> bool) -> HeaderMap {
    let listed = connection_tokens(headers);
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if is_hop_by_hop(name) || listed.contains(name) || skip(name) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

/// Only these methods have their body forwarded.
pub fn method_carries_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}

/// Inbound headers to send upstream.
///
/// `host` and `content-length` are dropped along with hop-by-hop headers;
/// the client sets them for the outbound connection.
pub fn forwardable_headers(inbound: &HeaderMap) -> HeaderMap {
    end_to_end_headers(inbound, |name| {
        *name == header::HOST || *name == header::CONTENT_LENGTH
    })
}

/// Backend response headers to relay.
fn relayable_headers(upstream: &HeaderMap) -> HeaderMap {
    end_to_end_headers(upstream, |_| false)
}

/// Client for backend calls.
///
/// System proxy variables are ignored: the edge proxy talks to its backend
/// directly. No timeout is set, a hung backend is bounded by the caller.
pub fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().no_proxy().build()
}

/// Outbound half of the proxy.
///
/// Wraps a `reqwest::Client`; cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
}

impl Forwarder {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Issue one request to `url` and turn the answer into a streaming response.
    ///
    /// Any status the backend returns, including 4xx/5xx, is relayed as-is.
    /// Only transport failures become `ProxyError::Upstream`.
    pub async fn forward(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> Result<Response, ProxyError> {
        let mut request = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        // The URL stays in the server log; the client only sees the cause.
        let upstream = request
            .send()
            .await
            .map_err(|e| ProxyError::Upstream(e.without_url()))?;
        debug!(url, status = upstream.status().as_u16(), "backend responded");

        let status = upstream.status();
        let headers = relayable_headers(upstream.headers());
        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}
