//! Network infrastructure for the server.
//!
//! # Sub-modules
//!
//! - **`acceptor`** – Binds the listening socket with a bounded backlog and
//!   runs the accept loop, handing each connection to a
//!   [`crate::application::session::PasswordSession`].  Sessions run one at a
//!   time unless concurrent mode is enabled.

pub mod acceptor;

pub use acceptor::{bind_listener, run_server, AcceptorConfig, ServerError};
