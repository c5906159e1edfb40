use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use salesquest_edge::dashboard::{CoachKind, Periodo, parse_vendor_id};
use salesquest_edge::logging::{self, LogFormat};

mod cmd;

#[derive(Parser)]
#[command(name = "salesquest-edge")]
#[command(version, about = "Edge proxy for the SalesQuest dashboard API")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Path to the config file. Defaults to ./edge.toml when present.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the edge proxy server
    Serve {
        /// Address to bind (overrides config and SALESQUEST_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to serve on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Backend origin (overrides config and SALESQUEST_BACKEND_URL)
        #[arg(long)]
        backend: Option<String>,
    },
    /// Call one dashboard endpoint through a running proxy and print the JSON
    Fetch {
        #[command(subcommand)]
        endpoint: FetchCommands,

        /// Proxied API root
        #[arg(long, default_value = "http://localhost:8787/api", global = true)]
        api: String,

        /// Keep polling every 30 seconds until Ctrl+C
        #[arg(long, global = true)]
        watch: bool,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum FetchCommands {
    /// GET /stats/geral
    Stats,
    /// GET /ranking?periodo=<periodo>
    Ranking {
        #[arg(default_value = "dia")]
        periodo: Periodo,
    },
    /// GET /vendedores
    Vendedores {
        /// Print one line per vendor instead of raw JSON
        #[arg(long)]
        summary: bool,
    },
    /// GET /coach/<kind>/<vendor_id>
    Coach {
        kind: CoachKind,
        #[arg(value_parser = parse_vendor_id)]
        vendor_id: String,
    },
    /// GET /analise/vendedor/<vendor_id>
    Analise {
        #[arg(value_parser = parse_vendor_id)]
        vendor_id: String,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Write a default edge.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    logging::init(cli.log_format, cli.verbose)?;

    let work_dir = std::env::current_dir().context("Failed to get current directory")?;

    match &cli.command {
        Commands::Serve {
            host,
            port,
            backend,
        } => {
            cmd::cmd_serve(
                &work_dir,
                cli.config.as_deref(),
                host.clone(),
                *port,
                backend.clone(),
            )
            .await?;
        }
        Commands::Fetch {
            endpoint,
            api,
            watch,
        } => cmd::cmd_fetch(api, endpoint.clone(), *watch).await?,
        Commands::Config { command } => {
            cmd::cmd_config(&work_dir, cli.config.as_deref(), command.clone())?
        }
    }

    Ok(())
}
