//! Request selectors for the dashboard API.
//!
//! Payloads themselves stay as `serde_json::Value`: the backend owns their
//! shape. Only the pieces of a URL the dashboard chooses are typed here.

use serde::{Deserialize, Serialize};

/// Ranking window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Periodo {
    #[default]
    Dia,
    Semana,
    Mes,
}

impl std::fmt::Display for Periodo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Periodo::Dia => write!(f, "dia"),
            Periodo::Semana => write!(f, "semana"),
            Periodo::Mes => write!(f, "mes"),
        }
    }
}

impl std::str::FromStr for Periodo {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dia" => Ok(Periodo::Dia),
            "semana" => Ok(Periodo::Semana),
            "mes" => Ok(Periodo::Mes),
            _ => anyhow::bail!("Invalid periodo '{}'. Valid values: dia, semana, mes", s),
        }
    }
}

/// AI coach message flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoachKind {
    Motivacao,
    Alerta,
    Provocacao,
    Relatorio,
}

impl std::fmt::Display for CoachKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoachKind::Motivacao => write!(f, "motivacao"),
            CoachKind::Alerta => write!(f, "alerta"),
            CoachKind::Provocacao => write!(f, "provocacao"),
            CoachKind::Relatorio => write!(f, "relatorio"),
        }
    }
}

impl std::str::FromStr for CoachKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "motivacao" => Ok(CoachKind::Motivacao),
            "alerta" => Ok(CoachKind::Alerta),
            "provocacao" => Ok(CoachKind::Provocacao),
            "relatorio" => Ok(CoachKind::Relatorio),
            _ => anyhow::bail!(
                "Invalid coach kind '{}'. Valid values: motivacao, alerta, provocacao, relatorio",
                s
            ),
        }
    }
}

/// Accept `id` as a single path segment.
///
/// Ids are pasted into the URL as-is, so anything that would change the
/// path or start a query/fragment is refused.
pub fn parse_vendor_id(id: &str) -> anyhow::Result<String> {
    if id.is_empty() || id == "." || id == ".." {
        anyhow::bail!("Invalid vendor id '{}'", id);
    }
    let forbidden = |c: char| {
        matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
    };
    if let Some(c) = id.chars().find(|&c| forbidden(c)) {
        anyhow::bail!("Invalid vendor id '{}': '{}' is not allowed", id, c.escape_default());
    }
    Ok(id.to_string())
}

/// One readable endpoint of the backend API, relative to the API root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    StatsGeral,
    Ranking(Periodo),
    Vendedores,
    Coach(CoachKind, String),
    AnaliseVendedor(String),
}

impl Endpoint {
    /// Check the free-form parts (vendor ids) before building a URL.
    pub fn validate(&self) -> anyhow::Result<()> {
        match self {
            Endpoint::Coach(_, vendor_id) | Endpoint::AnaliseVendedor(vendor_id) => {
                parse_vendor_id(vendor_id).map(drop)
            }
            _ => Ok(()),
        }
    }

    /// Path (and query) appended to the API root.
    pub fn path(&self) -> String {
        match self {
            Endpoint::StatsGeral => "/stats/geral".to_string(),
            Endpoint::Ranking(periodo) => format!("/ranking?periodo={}", periodo),
            Endpoint::Vendedores => "/vendedores".to_string(),
            Endpoint::Coach(kind, vendor_id) => format!("/coach/{}/{}", kind, vendor_id),
            Endpoint::AnaliseVendedor(vendor_id) => format!("/analise/vendedor/{}", vendor_id),
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
