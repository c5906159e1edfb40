//! Configuration view and validation commands — `salesquest-edge config`.

use anyhow::Result;
use std::path::Path;

use salesquest_edge::proxy_config::{self, CONFIG_FILE_NAME, EdgeToml};

use super::super::ConfigCommands;

pub fn cmd_config(
    work_dir: &Path,
    explicit: Option<&Path>,
    command: Option<ConfigCommands>,
) -> Result<()> {
    let config_path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| work_dir.join(CONFIG_FILE_NAME));

    match command {
        None | Some(ConfigCommands::Show) => {
            if config_path.exists() {
                println!("# Config file: {}", config_path.display());
            } else {
                println!("# No {} found, using defaults", CONFIG_FILE_NAME);
            }
            println!("# Effective values (with env overrides)");
            println!();
            let config = proxy_config::resolve(work_dir, explicit)?;
            print!("{}", config.to_toml_string()?);
        }
        Some(ConfigCommands::Validate) => {
            if explicit.is_none() && !config_path.exists() {
                println!("No {} found. Using defaults (valid).", CONFIG_FILE_NAME);
                return Ok(());
            }

            let config = proxy_config::resolve(work_dir, explicit)?;
            let warnings = config.validate();

            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in &warnings {
                    println!("  - {}", warning);
                }
                anyhow::bail!("Configuration has {} problem(s)", warnings.len());
            }
        }
        Some(ConfigCommands::Init { force }) => {
            if config_path.exists() && !force {
                println!("{} already exists at {}", CONFIG_FILE_NAME, config_path.display());
                println!("Pass --force to overwrite it.");
                return Ok(());
            }

            EdgeToml::default().save(&config_path)?;

            println!("Created {} at {}", CONFIG_FILE_NAME, config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [backend] base_url, path_prefix");
            println!("  - [cors] allow_headers, max_age");
            println!("  - [failure] status, include_timestamp");
        }
    }

    Ok(())
}
