//! pwgen interactive client entry point.
//!
//! ```text
//! pwgen-client [--host <HOST>] [--port <PORT>]
//! ```
//!
//! Connects, prints the server menu, and reads one request per line from
//! stdin until the user sends `q` (or stdin ends, which sends `q` for them).

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use pwgen_client::application::parse_input::parse_input_line;
use pwgen_client::application::render::{
    paint, render_response, Tone, DEFAULT_LENGTH_NOTICE, INVALID_INPUT_NOTICE,
};
use pwgen_client::infrastructure::network::ServerConnection;
use pwgen_core::protocol::messages::{DEFAULT_ADDRESS, DEFAULT_PORT};
use pwgen_core::PasswordRequest;

/// Interactive client for the pwgen password generator.
#[derive(Debug, Parser)]
#[command(name = "pwgen-client", about = "Remote password generator client", version)]
struct Cli {
    /// Server hostname or IP address.
    #[arg(long, default_value = DEFAULT_ADDRESS, env = "PWGEN_HOST")]
    host: String,

    /// Server TCP port.
    #[arg(long, default_value_t = DEFAULT_PORT, env = "PWGEN_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the menu.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut conn = ServerConnection::connect(&cli.host, cli.port).await?;
    println!("{}\n", paint("Connection completed", Tone::Status));

    let menu = conn.receive_menu().await.context("server did not send its menu")?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{}", paint(&menu.menu_text, Tone::Menu));
        std::io::stdout().flush().context("failed to flush stdout")?;

        let request = match lines.next_line().await.context("failed to read stdin")? {
            Some(line) => match parse_input_line(&line) {
                Ok(parsed) => {
                    if parsed.defaulted_length {
                        println!("{}", paint(DEFAULT_LENGTH_NOTICE, Tone::Notice));
                    }
                    parsed.request
                }
                Err(e) => {
                    tracing::debug!("rejected input: {e}");
                    println!("{}", paint(INVALID_INPUT_NOTICE, Tone::Failure));
                    continue;
                }
            },
            None => PasswordRequest::quit(),
        };

        let response = conn.request(&request).await.context("request failed")?;
        match render_response(&response) {
            Some((text, tone)) => println!("{}\n", paint(&text, tone)),
            None => break,
        }
    }

    Ok(())
}
