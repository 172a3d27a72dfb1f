//! Parsing of the line the user types at the menu prompt.
//!
//! Leading whitespace is skipped and the first character is the selector.
//! Whatever follows is split on whitespace:
//!
//! | Input        | Result                                   |
//! |--------------|------------------------------------------|
//! | `n 12`       | selector `n`, length `"12"`              |
//! | `n12`        | selector `n`, length `"12"`              |
//! | `s`          | selector `s`, length defaults to `"8"`   |
//! | `s 12 extra` | rejected: too many tokens                |
//! | *(empty)*    | rejected                                 |
//!
//! The length is sent as typed; the server decides whether it is valid.

use pwgen_core::protocol::messages::{DEFAULT_LENGTH_TEXT, LENGTH_TEXT_CAPACITY};
use pwgen_core::PasswordRequest;
use thiserror::Error;

/// Why a line cannot be turned into a request.  Nothing is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("no input")]
    Empty,
    #[error("selector {0:?} is not a printable ASCII character")]
    InvalidSelector(char),
    #[error("expected a type and at most one length, got {0} extra tokens")]
    TooManyTokens(usize),
    #[error("length is {0} bytes long")]
    LengthTooLong(usize),
}

/// A line that can be sent to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInput {
    pub request: PasswordRequest,
    /// `true` when the user typed no length and the default was used.
    pub defaulted_length: bool,
}

/// Parses one input line (without its line terminator).
///
/// # Errors
///
/// Returns [`InputError`] for an empty line, a non-ASCII selector, more than
/// one token after the selector, or a length that does not fit the wire field.
pub fn parse_input_line(line: &str) -> Result<ParsedInput, InputError> {
    let mut chars = line.trim_start().chars();
    let selector = chars.next().ok_or(InputError::Empty)?;
    if !selector.is_ascii_graphic() {
        return Err(InputError::InvalidSelector(selector));
    }

    let tokens: Vec<&str> = chars.as_str().split_whitespace().collect();
    match tokens.as_slice() {
        [] => Ok(ParsedInput {
            request: PasswordRequest::new(selector, DEFAULT_LENGTH_TEXT),
            defaulted_length: true,
        }),
        [length] if length.len() >= LENGTH_TEXT_CAPACITY => {
            Err(InputError::LengthTooLong(length.len()))
        }
        [length] => Ok(ParsedInput {
            request: PasswordRequest::new(selector, *length),
            defaulted_length: false,
        }),
        [_, extra @ ..] => Err(InputError::TooManyTokens(extra.len())),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
