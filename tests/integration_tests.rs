//! CLI integration tests for salesquest-edge.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a salesquest-edge Command with a clean environment
fn edge() -> Command {
    let mut cmd = cargo_bin_cmd!("salesquest-edge");
    cmd.env_remove("SALESQUEST_BACKEND_URL")
        .env_remove("SALESQUEST_HOST")
        .env_remove("PORT")
        .env_remove("RUST_LOG");
    cmd
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_help() {
        edge()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("serve"))
            .stdout(predicate::str::contains("fetch"));
    }

    #[test]
    fn test_version() {
        edge().arg("--version").assert().success();
    }

    #[test]
    fn test_fetch_rejects_unknown_periodo() {
        edge()
            .args(["fetch", "ranking", "ano"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("dia, semana, mes"));
    }

    #[test]
    fn test_fetch_rejects_vendor_id_with_path_characters() {
        edge()
            .args(["fetch", "analise", "1/../x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid vendor id"));

        edge()
            .args(["fetch", "coach", "alerta", "1?y"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid vendor id"));
    }

    #[test]
    fn test_fetch_unreachable_api_fails_cleanly() {
        edge()
            .args(["fetch", "stats", "--api", "http://127.0.0.1:9/api"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No data from"));
    }
}

// =============================================================================
// Config Command Tests
// =============================================================================

mod config_commands {
    use super::*;

    #[test]
    fn test_config_show_defaults() {
        let dir = TempDir::new().unwrap();
        edge()
            .current_dir(dir.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No edge.toml found"))
            .stdout(predicate::str::contains("vendasvox.agenciacafeonline.com.br"))
            .stdout(predicate::str::contains("max_age = 86400"));
    }

    #[test]
    fn test_config_show_applies_env_override() {
        let dir = TempDir::new().unwrap();
        edge()
            .current_dir(dir.path())
            .env("SALESQUEST_BACKEND_URL", "http://212.85.23.66:5200")
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("http://212.85.23.66:5200"));
    }

    #[test]
    fn test_config_init_creates_file() {
        let dir = TempDir::new().unwrap();
        edge()
            .current_dir(dir.path())
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created edge.toml"));

        let content = fs::read_to_string(dir.path().join("edge.toml")).unwrap();
        assert!(content.contains("[backend]"));
        assert!(content.contains("[cors]"));
        assert!(content.contains("status = 502"));
    }

    #[test]
    fn test_config_init_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("edge.toml"), "[server]\nport = 1234\n").unwrap();

        edge()
            .current_dir(dir.path())
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("already exists"));

        let content = fs::read_to_string(dir.path().join("edge.toml")).unwrap();
        assert!(content.contains("1234"));
    }

    #[test]
    fn test_config_validate_valid_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("edge.toml"),
            "[backend]\nbase_url = \"http://localhost:5200\"\n",
        )
        .unwrap();

        edge()
            .current_dir(dir.path())
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration is valid."));
    }

    #[test]
    fn test_config_validate_reports_problems() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[failure]\nstatus = 404\n\n[proxy]\nmount = \"/\"\n").unwrap();

        edge()
            .current_dir(dir.path())
            .args(["config", "validate", "--config"])
            .arg(&path)
            .assert()
            .failure()
            .stdout(predicate::str::contains("5xx"))
            .stdout(predicate::str::contains("proxy.mount"));
    }

    #[test]
    fn test_serve_refuses_invalid_config() {
        let dir = TempDir::new().unwrap();
        edge()
            .current_dir(dir.path())
            .args(["serve", "--backend", "not a url", "--port", "0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("configuration problem"));
    }
}
