//! Infrastructure layer for the client.
//!
//! Contains the TCP connection to the server.

pub mod network;
