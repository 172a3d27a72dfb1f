//! Infrastructure layer for the server.
//!
//! Contains OS-facing adapters: the TCP listener and accept loop, and
//! file-system configuration storage.
//!
//! **Dependency rule**: this layer may depend on `application` and `pwgen_core`,
//! but MUST NOT be imported by the `application` layer.

pub mod network;
pub mod storage;
