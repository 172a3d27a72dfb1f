//! Console rendering of menus, notices, and server responses.

use colored::Colorize;
use pwgen_core::PasswordResponse;

/// Notice printed when the user omits the length.
pub const DEFAULT_LENGTH_NOTICE: &str = "(The length is absent, a default value is used: 8)";

/// Printed when a line cannot be sent.
pub const INVALID_INPUT_NOTICE: &str = "Invalid input. Please enter a valid type and length.";

/// Console colours used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Server menu.
    Menu,
    /// Informational notices.
    Notice,
    /// Generated passwords.
    Success,
    /// Rejected requests and invalid input.
    Failure,
    /// Connection status.
    Status,
}

/// Colours `text` for `tone`.
///
/// Colouring follows `colored`'s terminal detection, so output to a pipe or
/// with `NO_COLOR` set stays plain.
pub fn paint(text: &str, tone: Tone) -> String {
    match tone {
        Tone::Menu => text.yellow(),
        Tone::Notice => text.cyan(),
        Tone::Success => text.green(),
        Tone::Failure => text.red(),
        Tone::Status => text.blue(),
    }
    .to_string()
}

/// Plain-text rendering of a response, or `None` for the terminate response.
pub fn render_response(response: &PasswordResponse) -> Option<(String, Tone)> {
    match response {
        PasswordResponse::Terminate => None,
        PasswordResponse::Success { password } => {
            Some((format!("Password generated: {password}"), Tone::Success))
        }
        PasswordResponse::Error { message } => {
            Some((format!("Bad request: {}", message.trim_end()), Tone::Failure))
        }
    }
}
