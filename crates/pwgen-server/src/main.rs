//! pwgen server entry point.
//!
//! # Usage
//!
//! ```text
//! pwgen-server [OPTIONS]
//!
//! Options:
//!   --config      <PATH>   TOML config file [default: platform config dir]
//!   --bind        <ADDR>   IP address to listen on        [env: PWGEN_BIND]
//!   --port        <PORT>   TCP port                       [env: PWGEN_PORT]
//!   --backlog     <N>      Listen backlog                 [env: PWGEN_BACKLOG]
//!   --min-length  <N>      Shortest accepted password     [env: PWGEN_MIN_LENGTH]
//!   --max-length  <N>      Longest accepted password      [env: PWGEN_MAX_LENGTH]
//!   --concurrent           One task per connection        [env: PWGEN_CONCURRENT]
//!   --log-level   <LEVEL>  Used when RUST_LOG is unset    [env: PWGEN_LOG_LEVEL]
//! ```
//!
//! Flags override values from the config file; the file overrides built-in
//! defaults.
//!
//! # Startup
//!
//! ```text
//! main()
//!  └─ Cli::parse()             -- flags and env vars
//!  └─ load config file         -- --config or platform dir, defaults if absent
//!  └─ apply overrides, validate
//!  └─ bind_listener()          -- fatal on failure
//!  └─ run_server()             -- until Ctrl-C clears the running flag
//! ```

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pwgen_core::RandomPasswordGenerator;
use pwgen_server::infrastructure::network::{bind_listener, run_server, AcceptorConfig};
use pwgen_server::infrastructure::storage::config::{self, ServerConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Remote password generator server.
///
/// Sends a menu to each client, then answers (type, length) requests with a
/// freshly generated password until the client quits.
#[derive(Debug, Parser)]
#[command(name = "pwgen-server", about = "Remote password generator server", version)]
struct Cli {
    /// Path to a TOML config file.  Defaults to `pwgen/server.toml` in the
    /// platform config directory.
    #[arg(long, env = "PWGEN_CONFIG")]
    config: Option<PathBuf>,

    /// IP address to bind.  Use `0.0.0.0` to accept connections on every interface.
    #[arg(long, env = "PWGEN_BIND")]
    bind: Option<String>,

    /// TCP port to listen on.
    #[arg(long, env = "PWGEN_PORT")]
    port: Option<u16>,

    /// Maximum number of pending connections queued by the OS.
    #[arg(long, env = "PWGEN_BACKLOG")]
    backlog: Option<u32>,

    /// Shortest password length clients may request.
    #[arg(long, env = "PWGEN_MIN_LENGTH")]
    min_length: Option<usize>,

    /// Longest password length clients may request (at most 32).
    #[arg(long, env = "PWGEN_MAX_LENGTH")]
    max_length: Option<usize>,

    /// Serve every connection on its own task instead of one at a time.
    #[arg(long, env = "PWGEN_CONCURRENT")]
    concurrent: bool,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, env = "PWGEN_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Loads the config file and applies the command-line overrides on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// merged configuration is invalid.
    fn into_server_config(self) -> anyhow::Result<ServerConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load_config_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => config::load_config().context("failed to load config")?,
        };
        self.apply_overrides(&mut cfg);
        cfg.validate().context("invalid server configuration")?;
        Ok(cfg)
    }

    fn apply_overrides(self, cfg: &mut ServerConfig) {
        if let Some(bind) = self.bind {
            cfg.server.bind_address = bind;
        }
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
        if let Some(backlog) = self.backlog {
            cfg.server.backlog = backlog;
        }
        if let Some(min) = self.min_length {
            cfg.passwords.min_length = min;
        }
        if let Some(max) = self.max_length {
            cfg.passwords.max_length = max;
        }
        if self.concurrent {
            cfg.server.concurrent = true;
        }
        if let Some(level) = self.log_level {
            cfg.server.log_level = level;
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Cli::parse().into_server_config()?;

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.server.log_level)),
        )
        .init();

    let addr = cfg.socket_addr()?;
    let acceptor = AcceptorConfig::from_server_config(&cfg)?;
    let listener = bind_listener(addr, cfg.server.backlog)
        .with_context(|| format!("failed to start listener on {addr}"))?;

    info!(
        "pwgen server starting: backlog={}, lengths {}..={}",
        cfg.server.backlog,
        acceptor.bounds.min(),
        acceptor.bounds.max()
    );

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C; stopping after the current session");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    run_server(listener, acceptor, Arc::new(RandomPasswordGenerator), running).await;

    info!("pwgen server stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_without_flags_leaves_config_untouched() {
        // Arrange
        let cli = Cli::parse_from(["pwgen-server"]);
        let mut cfg = ServerConfig::default();

        // Act
        cli.apply_overrides(&mut cfg);

        // Assert
        assert_eq!(cfg, ServerConfig::default());
    }

    #[test]
    fn test_cli_flags_override_config_values() {
        let cli = Cli::parse_from([
            "pwgen-server",
            "--bind",
            "0.0.0.0",
            "--port",
            "9000",
            "--backlog",
            "16",
            "--min-length",
            "10",
            "--max-length",
            "20",
            "--concurrent",
            "--log-level",
            "debug",
        ]);
        let mut cfg = ServerConfig::default();

        cli.apply_overrides(&mut cfg);

        assert_eq!(cfg.server.bind_address, "0.0.0.0");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.backlog, 16);
        assert!(cfg.server.concurrent);
        assert_eq!(cfg.server.log_level, "debug");
        assert_eq!(cfg.passwords.min_length, 10);
        assert_eq!(cfg.passwords.max_length, 20);
    }

    #[test]
    fn test_into_server_config_rejects_invalid_override() {
        let cli = Cli::parse_from([
            "pwgen-server",
            "--config",
            "/nonexistent/pwgen/server.toml",
            "--max-length",
            "64",
        ]);

        assert!(cli.into_server_config().is_err());
    }

    #[test]
    fn test_into_server_config_with_missing_file_uses_defaults() {
        let cli = Cli::parse_from(["pwgen-server", "--config", "/nonexistent/pwgen/server.toml"]);

        let cfg = cli.into_server_config().expect("defaults are valid");

        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.bind_address, "127.0.0.1");
    }
}
