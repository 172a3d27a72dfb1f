//! All pwgen protocol message types.
//!
//! Three messages exist, each with a fixed encoded size:
//!
//! | Message            | Direction       | Wire size |
//! |--------------------|-----------------|-----------|
//! | [`MenuMessage`]    | server → client | 1024      |
//! | [`PasswordRequest`]| client → server | 1025      |
//! | [`PasswordResponse`]| server → client | 85       |
//!
//! See [`crate::protocol::codec`] for the exact byte layout.

// ── Protocol constants ────────────────────────────────────────────────────────

/// Capacity of the menu text field, including the trailing NUL.
pub const MENU_TEXT_CAPACITY: usize = 1024;

/// Capacity of the request length-text field, including the trailing NUL.
pub const LENGTH_TEXT_CAPACITY: usize = 1024;

/// Largest password the protocol can carry.
pub const MAX_PASSWORD_LENGTH: usize = 32;

/// Smallest password length accepted by default.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Capacity of the response password field, including the trailing NUL.
pub const PASSWORD_CAPACITY: usize = MAX_PASSWORD_LENGTH + 1;

/// Capacity of the response error-message field, including the trailing NUL.
pub const ERROR_MESSAGE_CAPACITY: usize = 50;

/// Encoded size of a [`MenuMessage`].
pub const MENU_WIRE_SIZE: usize = MENU_TEXT_CAPACITY;

/// Encoded size of a [`PasswordRequest`]: selector byte + length text.
pub const REQUEST_WIRE_SIZE: usize = 1 + LENGTH_TEXT_CAPACITY;

/// Encoded size of a [`PasswordResponse`]: continue flag + password + error flag + error text.
pub const RESPONSE_WIRE_SIZE: usize = 1 + PASSWORD_CAPACITY + 1 + ERROR_MESSAGE_CAPACITY;

/// Selector that ends the session (compared case-insensitively).
pub const QUIT_SELECTOR: char = 'q';

/// Length the interactive client sends when the user omits one.
pub const DEFAULT_LENGTH_TEXT: &str = "8";

/// Default address the server binds to and the client connects to.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1";

/// Default TCP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default listen backlog.
pub const DEFAULT_BACKLOG: u32 = 5;

// ── MenuMessage ───────────────────────────────────────────────────────────────

/// MENU: sent once by the server immediately after accepting a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuMessage {
    /// Human-readable menu, at most `MENU_TEXT_CAPACITY - 1` bytes.
    pub menu_text: String,
}

impl MenuMessage {
    /// Wraps arbitrary menu text.
    pub fn new(menu_text: impl Into<String>) -> Self {
        Self {
            menu_text: menu_text.into(),
        }
    }

    /// Builds the standard menu advertising the given inclusive length bounds.
    pub fn for_bounds(min_length: usize, max_length: usize) -> Self {
        Self::new(format!(
            "Insert the type of password and its length (between {min_length} and {max_length}):\n\
             \x20 n: numeric password (only digits)\n\
             \x20 a: alphabetic password (only lowercase letters)\n\
             \x20 m: mixed password (lowercase letters and digits)\n\
             \x20 s: secure password (uppercase letters, lowercase letters, digits, and symbols)\n\
             \x20 q: to close the connection\n\
             ? "
        ))
    }
}

impl Default for MenuMessage {
    fn default() -> Self {
        Self::for_bounds(MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH)
    }
}

// ── PasswordRequest ───────────────────────────────────────────────────────────

/// PASSWORD_REQUEST: one `(selector, length)` round sent by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordRequest {
    /// Class letter (`n`, `a`, `m`, `s`) or the quit letter `q`.  Must be ASCII.
    pub selector: char,
    /// Requested length as typed by the user.  May be empty or malformed;
    /// the server validates it.
    pub length_text: String,
}

impl PasswordRequest {
    /// Creates a request for `selector` with the raw `length_text`.
    pub fn new(selector: char, length_text: impl Into<String>) -> Self {
        Self {
            selector,
            length_text: length_text.into(),
        }
    }

    /// Creates the request that ends the session.
    pub fn quit() -> Self {
        Self::new(QUIT_SELECTOR, "")
    }

    /// Returns `true` when the selector is the quit letter, in either case.
    pub fn is_quit(&self) -> bool {
        self.selector.to_ascii_lowercase() == QUIT_SELECTOR
    }
}

// ── PasswordResponse ──────────────────────────────────────────────────────────

/// PASSWORD_RESPONSE: the server's answer to one [`PasswordRequest`].
///
/// On the wire this is a `continue` flag, a password, an `is_error` flag and an
/// error message.  In memory each round builds exactly one variant, so a
/// response can never carry a stale password next to an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordResponse {
    /// The client asked to quit; `continue` is false and both fields are empty.
    Terminate,
    /// A password was generated.
    Success { password: String },
    /// The request was rejected; the session continues.
    Error { message: String },
}

impl PasswordResponse {
    /// Builds a success response.
    pub fn success(password: impl Into<String>) -> Self {
        Self::Success {
            password: password.into(),
        }
    }

    /// Builds an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// The wire `continue` flag: `false` only for [`PasswordResponse::Terminate`].
    pub fn keep_going(&self) -> bool {
        !matches!(self, Self::Terminate)
    }

    /// The wire `is_error` flag.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// The generated password, or `""` for non-success responses.
    pub fn password(&self) -> &str {
        match self {
            Self::Success { password } => password,
            _ => "",
        }
    }

    /// The error message, or `""` for non-error responses.
    pub fn error_message(&self) -> &str {
        match self {
            Self::Error { message } => message,
            _ => "",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
