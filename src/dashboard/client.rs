use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::models::{CoachKind, Endpoint, Periodo};

/// How often the dashboard refreshes stats and ranking.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Read-only client for the proxied dashboard API.
///
/// Every call either yields the decoded JSON or `None`. Failures are logged
/// and otherwise swallowed, so a caller simply keeps what it rendered last.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: reqwest::Client,
    api_root: String,
}

impl DashboardClient {
    /// `api_root` is the proxied API base, e.g. `http://localhost:8787/api`.
    pub fn new(api_root: &str) -> Self {
        Self::with_client(reqwest::Client::new(), api_root)
    }

    pub fn with_client(client: reqwest::Client, api_root: &str) -> Self {
        Self {
            client,
            api_root: api_root.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.api_root, endpoint.path())
    }

    /// GET one endpoint. Invalid ids, network errors, non-2xx and bad JSON
    /// all give `None`.
    pub async fn fetch_json(&self, endpoint: &Endpoint) -> Option<Value> {
        if let Err(e) = endpoint.validate() {
            warn!(error = %e, "Refusing API request");
            return None;
        }
        let url = self.url_for(endpoint);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "API request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "API returned error status");
            return None;
        }

        match response.json::<Value>().await {
            Ok(Value::Null) => {
                debug!(%url, "API returned null");
                None
            }
            Ok(value) => Some(value),
            Err(e) => {
                warn!(%url, error = %e, "API returned invalid JSON");
                None
            }
        }
    }

    pub async fn stats_geral(&self) -> Option<Value> {
        self.fetch_json(&Endpoint::StatsGeral).await
    }

    pub async fn ranking(&self, periodo: Periodo) -> Option<Value> {
        self.fetch_json(&Endpoint::Ranking(periodo)).await
    }

    pub async fn vendedores(&self) -> Option<Value> {
        self.fetch_json(&Endpoint::Vendedores).await
    }

    pub async fn coach(&self, kind: CoachKind, vendor_id: &str) -> Option<Value> {
        self.fetch_json(&Endpoint::Coach(kind, vendor_id.to_string()))
            .await
    }

    pub async fn analise_vendedor(&self, vendor_id: &str) -> Option<Value> {
        self.fetch_json(&Endpoint::AnaliseVendedor(vendor_id.to_string()))
            .await
    }

    /// Fetch `endpoint` now and then every `interval`, handing each result to
    /// `on_update`. Never returns; cancel by dropping the future.
    pub async fn poll<F>(&self, endpoint: &Endpoint, interval: Duration, mut on_update: F)
    where
        F: FnMut(Option<Value>),
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            on_update(self.fetch_json(endpoint).await);
        }
    }
}

/// One display line per entry of a `/vendedores` payload.
///
/// Only recognised fields are read and missing optional ones are skipped.
/// Entries without a `nome` are ignored.
pub fn summarize_vendedores(payload: &Value) -> Vec<String> {
    let Some(vendedores) = payload.get("vendedores").and_then(Value::as_array) else {
        return Vec::new();
    };

    vendedores
        .iter()
        .filter_map(|v| {
            let nome = v.get("nome").and_then(Value::as_str)?;
            let mut line = nome.to_string();
            if let Some(nivel) = v.get("nivel").and_then(Value::as_i64) {
                line.push_str(&format!(" - Nível {}", nivel));
                if let Some(nivel_nome) = v.get("nivel_nome").and_then(Value::as_str) {
                    line.push_str(&format!(" ({})", nivel_nome));
                }
            }
            if let Some(xp) = v.get("xp_total").and_then(Value::as_i64) {
                line.push_str(&format!(" - {} XP", xp));
            }
            let badges = v
                .get("badges")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            line.push_str(&format!(" - {} badges", badges));
            Some(line)
        })
        .collect()
}
