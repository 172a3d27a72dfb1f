//! Connection to the pwgen server.
//!
//! [`ServerConnection`] is generic over the byte stream so the request cycle
//! can be exercised against in-memory streams in tests; production code uses
//! [`ServerConnection::connect`] to get one over TCP.

use pwgen_core::{
    read_message, write_message, MenuMessage, PasswordRequest, PasswordResponse, TransportError,
};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::debug;

/// Errors that can occur in the client network layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// TCP connection to the server failed.
    #[error("failed to connect to server at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// The established connection failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// An open session with the server.
pub struct ServerConnection<S> {
    stream: S,
}

impl ServerConnection<TcpStream> {
    /// Opens a TCP connection to `host:port`.  `host` may be a name or an IP.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connect`] if the address cannot be resolved or
    /// the connection is refused.
    pub async fn connect(host: &str, port: u16) -> Result<Self, ClientError> {
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|source| ClientError::Connect {
                addr: format!("{host}:{port}"),
                source,
            })?;
        debug!("connected to {host}:{port}");
        Ok(Self::new(stream))
    }
}

impl<S> ServerConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an already-connected stream.
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Receives the menu the server sends right after accepting.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the connection closes first.
    pub async fn receive_menu(&mut self) -> Result<MenuMessage, ClientError> {
        Ok(read_message(&mut self.stream).await?)
    }

    /// Sends one request and waits for its response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if either direction fails.
    pub async fn request(
        &mut self,
        request: &PasswordRequest,
    ) -> Result<PasswordResponse, ClientError> {
        write_message(&mut self.stream, request).await?;
        Ok(read_message(&mut self.stream).await?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
