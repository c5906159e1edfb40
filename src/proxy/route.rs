//! Inbound path → backend URL rewriting.

use axum::http::Uri;

use crate::errors::ProxyError;

/// Maps paths under the inbound mount onto the backend origin.
///
/// All work happens on the raw, still percent-encoded path so the backend
/// sees exactly the bytes the client sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRoute {
    mount: String,
    backend_root: String,
}

impl ProxyRoute {
    /// `mount` is the inbound prefix (e.g. `/api`), `base_url` the backend
    /// origin and `backend_prefix` the path prepended on the backend side.
    pub fn new(mount: &str, base_url: &str, backend_prefix: &str) -> Result<Self, ProxyError> {
        let mount = mount.trim_end_matches('/');
        if !mount.starts_with('/') {
            return Err(ProxyError::InvalidConfig(format!(
                "mount '{}' must start with '/' and name a non-root prefix",
                mount
            )));
        }
        if base_url.is_empty() {
            return Err(ProxyError::InvalidConfig(
                "backend base URL is empty".to_string(),
            ));
        }

        let backend_root = format!(
            "{}{}",
            base_url.trim_end_matches('/'),
            backend_prefix.trim_end_matches('/')
        );

        Ok(Self {
            mount: mount.to_string(),
            backend_root,
        })
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    /// Backend URL with the prefix applied, without a trailing slash.
    pub fn backend_root(&self) -> &str {
        &self.backend_root
    }

    /// Part of `path` after the mount, or `None` when `path` is outside it.
    ///
    /// `/api` and `/api/` both yield `""`; `/apix` is outside `/api`.
    pub fn wildcard<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.mount.as_str())?;
        if rest.is_empty() {
            return Some("");
        }
        rest.strip_prefix('/')
    }

    /// Full backend URL for an inbound URI.
    ///
    /// The raw query string is carried over unchanged; an empty query adds
    /// no `?`.
    pub fn backend_url(&self, uri: &Uri) -> Option<String> {
        let wildcard = self.wildcard(uri.path())?;
        let mut url = format!("{}/{}", self.backend_root, wildcard);
        if let Some(query) = uri.query().filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        Some(url)
    }
}
