//! Layered configuration for the edge proxy.
//!
//! Settings are read from `edge.toml` (or an explicit `--config` path), then
//! overridden by environment variables, then by CLI flags:
//!
//! | Layer       | Source                                                    |
//! |-------------|-----------------------------------------------------------|
//! | file        | `edge.toml`                                               |
//! | environment | `SALESQUEST_BACKEND_URL`, `SALESQUEST_HOST`, `PORT`       |
//! | CLI         | `serve --backend/--host/--port`                           |
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8787
//!
//! [backend]
//! base_url = "https://vendasvox.agenciacafeonline.com.br"
//! path_prefix = "/api"
//!
//! [proxy]
//! mount = "/api"
//! max_body_bytes = 10485760
//!
//! [cors]
//! allow_headers = "Content-Type"
//! max_age = 86400
//!
//! [failure]
//! status = 502
//! include_timestamp = true
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "edge.toml";

/// Backend origin used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "https://vendasvox.agenciacafeonline.com.br";

pub const ENV_BACKEND_URL: &str = "SALESQUEST_BACKEND_URL";
pub const ENV_HOST: &str = "SALESQUEST_HOST";
pub const ENV_PORT: &str = "PORT";

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8787
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Where requests are forwarded to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSection {
    /// Backend origin, e.g. `https://api.example.com` or `http://10.0.0.5:5200`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path prepended to the wildcard segment on the backend side
    #[serde(default = "default_api_prefix")]
    pub path_prefix: String,
}

fn default_base_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path_prefix: default_api_prefix(),
        }
    }
}

/// Inbound routing and request limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxySection {
    /// Inbound path prefix served by the proxy
    #[serde(default = "default_api_prefix")]
    pub mount: String,
    /// Largest request body buffered before forwarding
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for ProxySection {
    fn default() -> Self {
        Self {
            mount: default_api_prefix(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Cross-origin header values. Origin and methods are fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsSection {
    #[serde(default = "default_allow_headers")]
    pub allow_headers: String,
    /// Preflight cache lifetime in seconds
    #[serde(default = "default_max_age")]
    pub max_age: u64,
}

fn default_allow_headers() -> String {
    "Content-Type".to_string()
}

fn default_max_age() -> u64 {
    86_400
}

impl Default for CorsSection {
    fn default() -> Self {
        Self {
            allow_headers: default_allow_headers(),
            max_age: default_max_age(),
        }
    }
}

/// Shape of the response sent when the backend cannot be reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureSection {
    #[serde(default = "default_failure_status")]
    pub status: u16,
    #[serde(default = "default_include_timestamp")]
    pub include_timestamp: bool,
}

fn default_failure_status() -> u16 {
    502
}

fn default_include_timestamp() -> bool {
    true
}

impl Default for FailureSection {
    fn default() -> Self {
        Self {
            status: default_failure_status(),
            include_timestamp: default_include_timestamp(),
        }
    }
}

/// Parsed `edge.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeToml {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub backend: BackendSection,
    #[serde(default)]
    pub proxy: ProxySection,
    #[serde(default)]
    pub cors: CorsSection,
    #[serde(default)]
    pub failure: FailureSection,
}

impl EdgeToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse edge.toml")
    }

    /// Load from `dir/edge.toml`, or defaults if the file doesn't exist.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize edge.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Render as TOML for display.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize edge.toml")
    }

    /// Apply environment overrides using the given lookup.
    ///
    /// Takes a lookup function instead of reading `std::env` directly so the
    /// layering can be exercised without mutating the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BACKEND_URL) {
            self.backend.base_url = url;
        }
        if let Some(host) = lookup(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} value '{}'", ENV_PORT, port))?;
        }
        Ok(())
    }

    /// Check the configuration and return a list of problems.
    ///
    /// An empty list means the configuration is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        match reqwest::Url::parse(&self.backend.base_url) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    warnings.push(format!(
                        "backend.base_url must use http or https, got '{}'",
                        url.scheme()
                    ));
                }
                if url.query().is_some() || url.fragment().is_some() {
                    warnings.push(
                        "backend.base_url must not carry a query string or fragment".to_string(),
                    );
                }
            }
            Err(e) => warnings.push(format!(
                "backend.base_url '{}' is not a valid URL: {}",
                self.backend.base_url, e
            )),
        }

        if !self.backend.path_prefix.is_empty() && !self.backend.path_prefix.starts_with('/') {
            warnings.push(format!(
                "backend.path_prefix '{}' must be empty or start with '/'",
                self.backend.path_prefix
            ));
        }

        let mount = self.proxy.mount.trim_end_matches('/');
        if !self.proxy.mount.starts_with('/') || mount.is_empty() {
            warnings.push(format!(
                "proxy.mount '{}' must start with '/' and name a non-root prefix",
                self.proxy.mount
            ));
        }
        if mount == "/health" {
            warnings.push("proxy.mount must not shadow /health".to_string());
        }

        if self.proxy.max_body_bytes == 0 {
            warnings.push("proxy.max_body_bytes must be greater than zero".to_string());
        }

        if !(500..=599).contains(&self.failure.status) {
            warnings.push(format!(
                "failure.status must be a 5xx code, got {}",
                self.failure.status
            ));
        }

        if self.cors.allow_headers.trim().is_empty() {
            warnings.push("cors.allow_headers must not be empty".to_string());
        }

        warnings
    }
}

/// Resolve configuration: explicit file, or `edge.toml` in `dir`, then environment.
pub fn resolve(dir: &Path, explicit: Option<&Path>) -> Result<EdgeToml> {
    let mut config = match explicit {
        Some(path) => EdgeToml::load(path)?,
        None => EdgeToml::load_or_default(dir)?,
    };
    config.apply_env(|key| std::env::var(key).ok())?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_canonical_policy() {
        let config = EdgeToml::default();
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.backend.base_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.backend.path_prefix, "/api");
        assert_eq!(config.proxy.mount, "/api");
        assert_eq!(config.cors.allow_headers, "Content-Type");
        assert_eq!(config.cors.max_age, 86_400);
        assert_eq!(config.failure.status, 502);
        assert!(config.failure.include_timestamp);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let config = EdgeToml::parse(
            r#"
[backend]
base_url = "http://212.85.23.66:5200"

[cors]
allow_headers = "*"
"#,
        )
        .unwrap();
        assert_eq!(config.backend.base_url, "http://212.85.23.66:5200");
        assert_eq!(config.backend.path_prefix, "/api");
        assert_eq!(config.cors.allow_headers, "*");
        assert_eq!(config.cors.max_age, 86_400);
        assert_eq!(config.server.port, 8787);
    }

    #[test]
    fn test_parse_invalid_toml_fails() {
        let err = EdgeToml::parse("[server\nport = ").unwrap_err();
        assert!(err.to_string().contains("edge.toml"));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = TempDir::new().unwrap();
        let config = EdgeToml::load_or_default(dir.path()).unwrap();
        assert_eq!(config.server.port, 8787);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut config = EdgeToml::default();
        config.server.port = 9000;
        config.failure.status = 500;
        let path = dir.path().join(CONFIG_FILE_NAME);
        config.save(&path).unwrap();

        let loaded = EdgeToml::load_or_default(dir.path()).unwrap();
        assert_eq!(loaded.server.port, 9000);
        assert_eq!(loaded.failure.status, 500);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = EdgeToml::default();
        let env: HashMap<&str, &str> = [
            (ENV_BACKEND_URL, "http://localhost:5200"),
            (ENV_HOST, "127.0.0.1"),
            (ENV_PORT, "3000"),
        ]
        .into_iter()
        .collect();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:5200");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_env_invalid_port_is_error() {
        let mut config = EdgeToml::default();
        let err = config
            .apply_env(|key| (key == ENV_PORT).then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_validate_flags_bad_values() {
        let mut config = EdgeToml::default();
        config.backend.base_url = "not a url".to_string();
        config.proxy.mount = "/".to_string();
        config.failure.status = 404;
        config.cors.allow_headers = " ".to_string();

        let warnings = config.validate();
        assert_eq!(warnings.len(), 4);
        assert!(warnings.iter().any(|w| w.contains("base_url")));
        assert!(warnings.iter().any(|w| w.contains("proxy.mount")));
        assert!(warnings.iter().any(|w| w.contains("5xx")));
        assert!(warnings.iter().any(|w| w.contains("allow_headers")));
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let mut config = EdgeToml::default();
        config.backend.base_url = "ftp://example.com".to_string();
        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.contains("http or https")));
    }
}
