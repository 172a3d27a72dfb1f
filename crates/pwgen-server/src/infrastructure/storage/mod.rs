//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the server's TOML configuration from an
//! explicit path or the platform config directory, falls back to defaults when
//! no file exists, and validates the result before the listener starts.

pub mod config;
