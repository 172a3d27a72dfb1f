//! pwgen-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! The client connects to a pwgen server, shows the menu it receives, turns
//! each line the user types into a `PasswordRequest`, and prints the server's
//! answer until the user quits.

/// Application layer: input parsing and response rendering.
pub mod application;

/// Infrastructure layer: the connection to the server.
pub mod infrastructure;
