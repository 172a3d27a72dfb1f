//! Protocol module containing message types, the fixed-layout codec, and
//! exact-count stream transport.

pub mod codec;
pub mod messages;
pub mod transport;

pub use codec::{decode_message, encode_message, ProtocolError, WireMessage};
pub use messages::*;
pub use transport::{read_frame, read_message, write_message, TransportError};
