//! Application layer for the server.
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure rules in `pwgen_core`) and the infrastructure (sockets, files).
//! Code here orchestrates domain objects to serve one client and depends only
//! on abstractions: any `AsyncRead + AsyncWrite` stream and any
//! [`pwgen_core::PasswordGenerator`].
//!
//! # Sub-modules
//!
//! - **`session`** – The per-connection state machine: send the menu, then
//!   answer requests until the client quits or the connection drops.

pub mod session;
