//! Exact-count message I/O over a byte stream.
//!
//! TCP is a *stream* protocol: a single `read()` may return fewer bytes than a
//! whole message.  Because every pwgen message has a fixed size, framing is
//! just "keep reading until exactly `WIRE_SIZE` bytes have arrived".  A read
//! that returns zero bytes before that point means the peer closed the
//! connection.
//!
//! These helpers are generic over Tokio's `AsyncRead`/`AsyncWrite`, so the
//! same code serves `TcpStream`, `tokio::io::duplex`, and scripted test mocks.

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::protocol::codec::{decode_message, encode_message, ProtocolError, WireMessage};

/// Errors raised while moving a message across a connection.
///
/// Every variant is fatal to the session that hit it.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer closed the connection before a full message arrived.
    #[error("connection closed after {received} of {expected} bytes ({message})")]
    ConnectionClosed {
        message: &'static str,
        expected: usize,
        received: usize,
    },

    /// The connection stopped accepting bytes before a full message was sent.
    #[error("short write: sent {written} of {expected} bytes ({message})")]
    ShortWrite {
        message: &'static str,
        expected: usize,
        written: usize,
    },

    /// The message could not be encoded or decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Any other I/O failure on the connection.
    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Returns `true` when the peer closed the connection cleanly between
    /// messages (zero bytes of the next message arrived).
    pub fn is_clean_close(&self) -> bool {
        matches!(self, TransportError::ConnectionClosed { received: 0, .. })
    }
}

/// Reads exactly one `M` from `reader`, retrying partial reads.
///
/// # Errors
///
/// - [`TransportError::ConnectionClosed`] if EOF arrives before `M::WIRE_SIZE` bytes.
/// - [`TransportError::Protocol`] if the bytes do not decode.
/// - [`TransportError::Io`] for any other read failure.
pub async fn read_message<M, R>(reader: &mut R) -> Result<M, TransportError>
where
    M: WireMessage,
    R: AsyncRead + Unpin,
{
    let frame = read_frame::<M, R>(reader).await?;
    Ok(decode_message(&frame)?)
}

/// Reads the `M::WIRE_SIZE` raw bytes of one `M` without decoding them.
///
/// Callers that must inspect a frame that fails to decode read it with this
/// and call [`decode_message`] themselves.
///
/// # Errors
///
/// - [`TransportError::ConnectionClosed`] if EOF arrives before `M::WIRE_SIZE` bytes.
/// - [`TransportError::Io`] for any other read failure.
pub async fn read_frame<M, R>(reader: &mut R) -> Result<Vec<u8>, TransportError>
where
    M: WireMessage,
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; M::WIRE_SIZE];
    let mut filled = 0;

    while filled < M::WIRE_SIZE {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            return Err(TransportError::ConnectionClosed {
                message: M::NAME,
                expected: M::WIRE_SIZE,
                received: filled,
            });
        }
        filled += n;
    }

    trace!("received {} ({} bytes)", M::NAME, M::WIRE_SIZE);
    Ok(buf)
}

/// Encodes `msg` and writes all `M::WIRE_SIZE` bytes to `writer`, then flushes.
///
/// # Errors
///
/// - [`TransportError::Protocol`] if the message does not encode.
/// - [`TransportError::ShortWrite`] if the writer stops accepting bytes.
/// - [`TransportError::Io`] for any other write failure.
pub async fn write_message<M, W>(writer: &mut W, msg: &M) -> Result<(), TransportError>
where
    M: WireMessage,
    W: AsyncWrite + Unpin,
{
    let bytes = encode_message(msg)?;
    let mut written = 0;

    while written < bytes.len() {
        let n = match writer.write(&bytes[written..]).await {
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::WriteZero => 0,
            Err(e) => return Err(e.into()),
        };
        if n == 0 {
            return Err(TransportError::ShortWrite {
                message: M::NAME,
                expected: bytes.len(),
                written,
            });
        }
        written += n;
    }
    writer.flush().await?;

    trace!("sent {} ({} bytes)", M::NAME, bytes.len());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
