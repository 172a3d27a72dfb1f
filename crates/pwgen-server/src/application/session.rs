//! Per-connection session state machine.
//!
//! ```text
//! Greeting ──menu sent──► AwaitingRequest ──request read──► Responding
//!                               ▲                               │
//!                               └──────── continue = true ──────┤
//!                                                               ▼
//!                                          continue = false ─► Closed
//! ```
//!
//! A transport failure in any state moves straight to `Closed` without sending
//! anything further.  Validation failures are not transport failures: they are
//! answered with an error response and the session keeps going.

use std::sync::Arc;

use pwgen_core::protocol::messages::{
    MenuMessage, PasswordRequest, PasswordResponse, QUIT_SELECTOR,
};
use pwgen_core::{
    decode_message, read_frame, validate_request, write_message, LengthBounds, PasswordGenerator,
    ProtocolError, TransportError, ValidationError,
};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// About to send the menu.
    Greeting,
    /// Waiting for the next full request.
    AwaitingRequest,
    /// Computing and sending the response to the last request.
    Responding,
    /// Terminal.  The connection is released.
    Closed,
}

/// How a session ended.
#[derive(Debug)]
pub enum SessionOutcome {
    /// The client sent the quit selector and received the terminate response.
    ClientQuit,
    /// The client closed the connection between requests.
    PeerClosed,
    /// The connection failed mid-message or could not be written.
    Failed(TransportError),
}

/// What a finished session did, returned to the acceptor for logging.
#[derive(Debug)]
pub struct SessionSummary {
    pub session_id: Uuid,
    /// Requests answered with a generated password.
    pub passwords_generated: u32,
    /// Requests answered with a validation error.
    pub validation_errors: u32,
    pub outcome: SessionOutcome,
}

impl SessionSummary {
    /// Total requests answered with a password or an error (quit excluded).
    pub fn requests_served(&self) -> u32 {
        self.passwords_generated + self.validation_errors
    }
}

/// Computes the response to one request.
///
/// The `continue` decision is made first: a quit request (either case) always
/// yields [`PasswordResponse::Terminate`] and is never validated.
pub fn handle_request(
    request: &PasswordRequest,
    bounds: LengthBounds,
    generator: &dyn PasswordGenerator,
) -> PasswordResponse {
    if request.is_quit() {
        return PasswordResponse::Terminate;
    }

    match validate_request(request.selector, &request.length_text, bounds) {
        Ok((class, length)) => PasswordResponse::success(generator.generate(class, length)),
        Err(e) => PasswordResponse::error(e.wire_message()),
    }
}

/// Computes the response to a request that arrived in full but could not be
/// decoded.
///
/// The selector byte is checked for quit before anything else, so a quit with
/// a malformed length still terminates.  Otherwise the request gets the
/// validation error it would have produced.
pub fn handle_undecodable_request(frame: &[u8], error: &ProtocolError) -> PasswordResponse {
    let quits = frame
        .first()
        .is_some_and(|b| b.to_ascii_lowercase() == QUIT_SELECTOR as u8);
    if quits {
        return PasswordResponse::Terminate;
    }

    let rejection = match error {
        ProtocolError::InvalidSelectorByte(_) => ValidationError::InvalidType,
        _ => ValidationError::InvalidLength,
    };
    PasswordResponse::error(rejection.wire_message())
}

/// One client connection driven from greeting to close.
///
/// Generic over the stream so the same state machine runs on a `TcpStream`
/// in production and on in-memory streams in tests.
pub struct PasswordSession<S> {
    id: Uuid,
    stream: S,
    menu: MenuMessage,
    bounds: LengthBounds,
    generator: Arc<dyn PasswordGenerator>,
    state: SessionState,
    passwords_generated: u32,
    validation_errors: u32,
}

impl<S> PasswordSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a session in the `Greeting` state with a fresh id.
    pub fn new(stream: S, bounds: LengthBounds, generator: Arc<dyn PasswordGenerator>) -> Self {
        Self {
            id: Uuid::new_v4(),
            stream,
            menu: MenuMessage::for_bounds(bounds.min(), bounds.max()),
            bounds,
            generator,
            state: SessionState::Greeting,
            passwords_generated: 0,
            validation_errors: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Runs the session to completion and releases the stream.
    pub async fn run(mut self) -> SessionSummary {
        let outcome = match self.drive().await {
            Ok(()) => SessionOutcome::ClientQuit,
            Err(e) if e.is_clean_close() && self.state == SessionState::AwaitingRequest => {
                SessionOutcome::PeerClosed
            }
            Err(e) => {
                warn!(session = %self.id, state = ?self.state, "session aborted: {e}");
                SessionOutcome::Failed(e)
            }
        };
        self.state = SessionState::Closed;

        let summary = SessionSummary {
            session_id: self.id,
            passwords_generated: self.passwords_generated,
            validation_errors: self.validation_errors,
            outcome,
        };
        info!(
            session = %summary.session_id,
            generated = summary.passwords_generated,
            errors = summary.validation_errors,
            "session closed: {:?}",
            summary.outcome
        );
        summary
    }

    async fn drive(&mut self) -> Result<(), TransportError> {
        self.state = SessionState::Greeting;
        write_message(&mut self.stream, &self.menu).await?;
        debug!(session = %self.id, "menu sent");

        loop {
            self.state = SessionState::AwaitingRequest;
            let frame = read_frame::<PasswordRequest, _>(&mut self.stream).await?;
            self.state = SessionState::Responding;
            let response = match decode_message::<PasswordRequest>(&frame) {
                Ok(request) => {
                    debug!(
                        session = %self.id,
                        selector = %request.selector,
                        length = %request.length_text,
                        "request received"
                    );
                    handle_request(&request, self.bounds, self.generator.as_ref())
                }
                Err(e) => {
                    debug!(session = %self.id, "undecodable request: {e}");
                    handle_undecodable_request(&frame, &e)
                }
            };

            match &response {
                PasswordResponse::Success { .. } => self.passwords_generated += 1,
                PasswordResponse::Error { message } => {
                    self.validation_errors += 1;
                    debug!(session = %self.id, "rejected: {}", message.trim_end());
                }
                PasswordResponse::Terminate => {}
            }

            write_message(&mut self.stream, &response).await?;
            if !response.keep_going() {
                return Ok(());
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
