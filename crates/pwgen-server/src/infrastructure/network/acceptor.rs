//! TCP listener and accept loop.
//!
//! The default mode serves one connection at a time: accept, run the session
//! to completion, accept the next.  Clients that connect meanwhile wait in the
//! kernel's listen backlog and receive their menu only once the current
//! session closes.  Concurrent mode spawns one Tokio task per connection.
//!
//! Shutdown is driven by a shared `AtomicBool`.  `accept()` is wrapped in a
//! 200 ms timeout so the flag is observed even when nobody connects.  A session
//! already in progress is never interrupted.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use pwgen_core::{LengthBounds, PasswordGenerator};
use thiserror::Error;
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::time::{sleep, timeout};
use tracing::{error, info};

use crate::application::session::PasswordSession;
use crate::infrastructure::storage::config::{ConfigError, ServerConfig};

/// How often the accept loop re-checks the shutdown flag.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Errors raised while setting up the listening socket.  Fatal to startup.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to create socket for {addr}: {source}")]
    Socket {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("bind failed on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("listen failed on {addr}: {source}")]
    Listen {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Everything the accept loop needs besides the listener itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptorConfig {
    pub bounds: LengthBounds,
    /// Serve each connection on its own task.
    pub concurrent: bool,
}

impl AcceptorConfig {
    /// Extracts the accept-loop settings from a loaded [`ServerConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBounds`] if the length bounds are invalid.
    pub fn from_server_config(config: &ServerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            bounds: config.length_bounds()?,
            concurrent: config.server.concurrent,
        })
    }
}

impl Default for AcceptorConfig {
    fn default() -> Self {
        Self {
            bounds: LengthBounds::default(),
            concurrent: false,
        }
    }
}

/// Binds `addr` and starts listening with a queue of `backlog` pending connections.
///
/// # Errors
///
/// Returns [`ServerError`] naming the step (socket, bind, listen) that failed.
pub fn bind_listener(addr: SocketAddr, backlog: u32) -> Result<TcpListener, ServerError> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    }
    .map_err(|source| ServerError::Socket { addr, source })?;

    // Lets a restarted server rebind while old connections sit in TIME_WAIT.
    #[cfg(unix)]
    socket
        .set_reuseaddr(true)
        .map_err(|source| ServerError::Socket { addr, source })?;

    socket
        .bind(addr)
        .map_err(|source| ServerError::Bind { addr, source })?;
    socket
        .listen(backlog)
        .map_err(|source| ServerError::Listen { addr, source })
}

/// Runs the accept loop on `listener` until `running` is cleared.
///
/// Accept errors are logged and the loop retries after one poll interval.
/// In sequential mode the flag is only checked between sessions.
pub async fn run_server(
    listener: TcpListener,
    config: AcceptorConfig,
    generator: Arc<dyn PasswordGenerator>,
    running: Arc<AtomicBool>,
) {
    if let Ok(addr) = listener.local_addr() {
        let mode = if config.concurrent { "concurrent" } else { "sequential" };
        info!("listening on {addr} ({mode})");
    }

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        match timeout(ACCEPT_POLL_INTERVAL, listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                let generator = Arc::clone(&generator);
                if config.concurrent {
                    tokio::spawn(serve_connection(stream, peer_addr, config.bounds, generator));
                } else {
                    serve_connection(stream, peer_addr, config.bounds, generator).await;
                }
            }
            Ok(Err(e)) => back_off_after_accept_error(&e).await,
            Err(_) => {
                // No connection within the poll interval.
            }
        }
    }
}

/// Logs a failed `accept` and waits one poll interval before the next try.
///
/// Errors such as running out of file descriptors repeat on every call until
/// a connection is released.
async fn back_off_after_accept_error(error: &std::io::Error) {
    error!("accept error: {error}");
    sleep(ACCEPT_POLL_INTERVAL).await;
}

/// Runs one session on an accepted connection.
async fn serve_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    bounds: LengthBounds,
    generator: Arc<dyn PasswordGenerator>,
) {
    let session = PasswordSession::new(stream, bounds, generator);
    info!(session = %session.id(), peer = %peer_addr, "connection accepted");
    session.run().await;
}

// ── Tests ─────────────────────────────────────────────────────────────────────
