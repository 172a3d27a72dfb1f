//! # pwgen-core
//!
//! Shared library for pwgen containing the fixed-layout wire protocol, request
//! validation, and the password generators.
//!
//! This crate is used by both the server and the client.
//! It has no dependency on network sockets, configuration files, or consoles;
//! message I/O is expressed over any `AsyncRead`/`AsyncWrite` byte stream.
//!
//! # Architecture overview
//!
//! pwgen is a tiny remote password generator.  A client connects, receives a
//! menu, and then sends `(selector, length)` requests until it sends `q`.
//!
//! - **`protocol`** – How bytes travel over the connection.  Every message has a
//!   fixed size known to both peers, so there is no length prefix: the reader
//!   simply reads exactly that many bytes.
//!
//! - **`domain`** – Pure business logic with no I/O: the four password classes
//!   and their alphabets, request validation, and the random generators.

pub mod domain;
pub mod protocol;

pub use domain::password::{generate_password, PasswordClass, PasswordGenerator, RandomPasswordGenerator};
pub use domain::validation::{validate_request, LengthBounds, ValidationError};
pub use protocol::codec::{decode_message, encode_message, ProtocolError, WireMessage};
pub use protocol::messages::{MenuMessage, PasswordRequest, PasswordResponse};
pub use protocol::transport::{read_frame, read_message, write_message, TransportError};
