//! `salesquest-edge fetch`: call one dashboard API endpoint.

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use salesquest_edge::dashboard::{DashboardClient, Endpoint, POLL_INTERVAL, summarize_vendedores};

use super::super::FetchCommands;

fn endpoint_for(command: &FetchCommands) -> Endpoint {
    match command {
        FetchCommands::Stats => Endpoint::StatsGeral,
        FetchCommands::Ranking { periodo } => Endpoint::Ranking(*periodo),
        FetchCommands::Vendedores { .. } => Endpoint::Vendedores,
        FetchCommands::Coach { kind, vendor_id } => Endpoint::Coach(*kind, vendor_id.clone()),
        FetchCommands::Analise { vendor_id } => Endpoint::AnaliseVendedor(vendor_id.clone()),
    }
}

fn render(command: &FetchCommands, data: &Value) -> Result<String> {
    if let FetchCommands::Vendedores { summary: true } = command {
        return Ok(summarize_vendedores(data).join("\n"));
    }
    serde_json::to_string_pretty(data).context("Failed to format response")
}

pub async fn cmd_fetch(api: &str, command: FetchCommands, watch: bool) -> Result<()> {
    let client = DashboardClient::new(api);
    let endpoint = endpoint_for(&command);

    if !watch {
        let data = client
            .fetch_json(&endpoint)
            .await
            .with_context(|| format!("No data from {}", client.url_for(&endpoint)))?;
        println!("{}", render(&command, &data)?);
        return Ok(());
    }

    info!(url = %client.url_for(&endpoint), "Polling every {}s", POLL_INTERVAL.as_secs());
    let poll = client.poll(&endpoint, POLL_INTERVAL, |data| match data {
        Some(data) => match render(&command, &data) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("{:#}", e),
        },
        None => info!("No data this round, keeping previous output"),
    });

    tokio::select! {
        _ = poll => {}
        _ = tokio::signal::ctrl_c() => info!("Stopped polling"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesquest_edge::dashboard::{CoachKind, Periodo};
    use serde_json::json;

    #[test]
    fn test_endpoint_for_commands() {
        assert_eq!(endpoint_for(&FetchCommands::Stats), Endpoint::StatsGeral);
        assert_eq!(
            endpoint_for(&FetchCommands::Ranking {
                periodo: Periodo::Semana
            }),
            Endpoint::Ranking(Periodo::Semana)
        );
        assert_eq!(
            endpoint_for(&FetchCommands::Coach {
                kind: CoachKind::Alerta,
                vendor_id: "3".into()
            })
            .path(),
            "/coach/alerta/3"
        );
    }

    #[test]
    fn test_render_summary_vs_raw() {
        let data = json!({"vendedores": [{"nome": "Ana", "badges": []}]});
        let summary = render(&FetchCommands::Vendedores { summary: true }, &data).unwrap();
        assert_eq!(summary, "Ana - 0 badges");

        let raw = render(&FetchCommands::Vendedores { summary: false }, &data).unwrap();
        assert!(raw.contains("\"nome\": \"Ana\""));
    }
}
