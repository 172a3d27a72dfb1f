//! Application layer for the client.
//!
//! - **`parse_input`** – Turns one line typed by the user into a
//!   `PasswordRequest`, or explains why it cannot be sent.
//! - **`render`** – Formats server responses and console notices.

pub mod parse_input;
pub mod render;
