//! Fixed-layout binary codec for pwgen protocol messages.
//!
//! Every message has a constant encoded size, so the wire carries no header,
//! length prefix, or delimiter.  Layouts (offsets in bytes):
//!
//! ```text
//! MenuMessage      [menu_text:1024]                                        = 1024
//! PasswordRequest  [selector:1][length_text:1024]                          = 1025
//! PasswordResponse [continue:1][password:33][is_error:1][error_message:50] =   85
//! ```
//!
//! Text fields are UTF-8, NUL-terminated, and NUL-padded to their capacity, so
//! the content of a field of capacity `N` is at most `N - 1` bytes.  Flags are
//! a single byte, `0x00` or `0x01`.  There is no implicit struct padding and no
//! multi-byte integer, so the layout is identical on every host.

use thiserror::Error;

use crate::protocol::messages::{
    MenuMessage, PasswordRequest, PasswordResponse, ERROR_MESSAGE_CAPACITY, LENGTH_TEXT_CAPACITY,
    MENU_TEXT_CAPACITY, MENU_WIRE_SIZE, PASSWORD_CAPACITY, REQUEST_WIRE_SIZE, RESPONSE_WIRE_SIZE,
};

/// Errors that can occur during message encoding or decoding.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The byte slice is shorter than the fixed message size.
    #[error("insufficient data: need {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// A text value does not fit its fixed-capacity field.
    #[error("{field}: {length} bytes do not fit a {capacity}-byte field")]
    FieldTooLong {
        field: &'static str,
        capacity: usize,
        length: usize,
    },

    /// The selector cannot be represented as a single ASCII byte.
    #[error("selector {0:?} is not a single ASCII character")]
    NonAsciiSelector(char),

    /// A received selector byte is NUL or outside ASCII.
    #[error("selector byte 0x{0:02X} is not a printable selector")]
    InvalidSelectorByte(u8),

    /// The payload could not be parsed (bad flag byte, UTF-8 error, inconsistent fields, etc.).
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// A protocol message with a fixed encoded size.
pub trait WireMessage: Sized {
    /// Exact number of bytes this message occupies on the wire.
    const WIRE_SIZE: usize;

    /// Short name used in log lines and error messages.
    const NAME: &'static str;

    /// Appends exactly [`Self::WIRE_SIZE`] bytes to `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] if a field does not fit the layout.
    fn encode_into(&self, buf: &mut Vec<u8>) -> Result<(), ProtocolError>;

    /// Parses a slice of exactly [`Self::WIRE_SIZE`] bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] if the bytes are malformed.
    fn decode_from(bytes: &[u8]) -> Result<Self, ProtocolError>;
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes `msg` into a byte vector of exactly `M::WIRE_SIZE` bytes.
///
/// # Errors
///
/// Returns [`ProtocolError`] if a field does not fit the fixed layout.
///
/// # Examples
///
/// ```rust
/// use pwgen_core::protocol::{decode_message, encode_message, PasswordRequest, REQUEST_WIRE_SIZE};
///
/// let msg = PasswordRequest::new('n', "8");
/// let bytes = encode_message(&msg).unwrap();
/// assert_eq!(bytes.len(), REQUEST_WIRE_SIZE);
/// let decoded: PasswordRequest = decode_message(&bytes).unwrap();
/// assert_eq!(decoded, msg);
/// ```
pub fn encode_message<M: WireMessage>(msg: &M) -> Result<Vec<u8>, ProtocolError> {
    let mut buf = Vec::with_capacity(M::WIRE_SIZE);
    msg.encode_into(&mut buf)?;
    debug_assert_eq!(buf.len(), M::WIRE_SIZE, "{} encoded to the wrong size", M::NAME);
    Ok(buf)
}

/// Decodes one message from the first `M::WIRE_SIZE` bytes of `bytes`.
///
/// # Errors
///
/// Returns [`ProtocolError::InsufficientData`] when `bytes` is too short, or
/// another [`ProtocolError`] if the content is malformed.
pub fn decode_message<M: WireMessage>(bytes: &[u8]) -> Result<M, ProtocolError> {
    if bytes.len() < M::WIRE_SIZE {
        return Err(ProtocolError::InsufficientData {
            needed: M::WIRE_SIZE,
            available: bytes.len(),
        });
    }
    M::decode_from(&bytes[..M::WIRE_SIZE])
}

// ── Per-message layouts ───────────────────────────────────────────────────────

impl WireMessage for MenuMessage {
    const WIRE_SIZE: usize = MENU_WIRE_SIZE;
    const NAME: &'static str = "Menu";

    fn encode_into(&self, buf: &mut Vec<u8>) -> Result<(), ProtocolError> {
        write_fixed_string(buf, &self.menu_text, MENU_TEXT_CAPACITY, "Menu.menu_text")
    }

    fn decode_from(p: &[u8]) -> Result<Self, ProtocolError> {
        let menu_text = read_fixed_string(p, 0, MENU_TEXT_CAPACITY, "Menu.menu_text")?;
        Ok(MenuMessage { menu_text })
    }
}

impl WireMessage for PasswordRequest {
    const WIRE_SIZE: usize = REQUEST_WIRE_SIZE;
    const NAME: &'static str = "PasswordRequest";

    fn encode_into(&self, buf: &mut Vec<u8>) -> Result<(), ProtocolError> {
        if !self.selector.is_ascii() || self.selector == '\0' {
            return Err(ProtocolError::NonAsciiSelector(self.selector));
        }
        buf.push(self.selector as u8);
        write_fixed_string(
            buf,
            &self.length_text,
            LENGTH_TEXT_CAPACITY,
            "PasswordRequest.length_text",
        )
    }

    fn decode_from(p: &[u8]) -> Result<Self, ProtocolError> {
        let selector_byte = p[0];
        if !selector_byte.is_ascii() || selector_byte == 0 {
            return Err(ProtocolError::InvalidSelectorByte(selector_byte));
        }
        let length_text =
            read_fixed_string(p, 1, LENGTH_TEXT_CAPACITY, "PasswordRequest.length_text")?;
        Ok(PasswordRequest {
            selector: selector_byte as char,
            length_text,
        })
    }
}

impl WireMessage for PasswordResponse {
    const WIRE_SIZE: usize = RESPONSE_WIRE_SIZE;
    const NAME: &'static str = "PasswordResponse";

    fn encode_into(&self, buf: &mut Vec<u8>) -> Result<(), ProtocolError> {
        match self {
            PasswordResponse::Success { password } if password.is_empty() => {
                return Err(ProtocolError::MalformedPayload(
                    "PasswordResponse: success without a password".to_string(),
                ));
            }
            PasswordResponse::Error { message } if message.is_empty() => {
                return Err(ProtocolError::MalformedPayload(
                    "PasswordResponse: error without a message".to_string(),
                ));
            }
            _ => {}
        }

        buf.push(encode_flag(self.keep_going()));
        write_fixed_string(buf, self.password(), PASSWORD_CAPACITY, "PasswordResponse.password")?;
        buf.push(encode_flag(self.is_error()));
        write_fixed_string(
            buf,
            self.error_message(),
            ERROR_MESSAGE_CAPACITY,
            "PasswordResponse.error_message",
        )
    }

    fn decode_from(p: &[u8]) -> Result<Self, ProtocolError> {
        const PASSWORD_OFF: usize = 1;
        const IS_ERROR_OFF: usize = PASSWORD_OFF + PASSWORD_CAPACITY;
        const MESSAGE_OFF: usize = IS_ERROR_OFF + 1;

        let keep_going = decode_flag(p[0], "PasswordResponse.continue")?;
        let password =
            read_fixed_string(p, PASSWORD_OFF, PASSWORD_CAPACITY, "PasswordResponse.password")?;
        let is_error = decode_flag(p[IS_ERROR_OFF], "PasswordResponse.is_error")?;
        let message = read_fixed_string(
            p,
            MESSAGE_OFF,
            ERROR_MESSAGE_CAPACITY,
            "PasswordResponse.error_message",
        )?;

        // Exactly one of: password set, error set, or terminate with both empty.
        match (keep_going, is_error, password.is_empty(), message.is_empty()) {
            (false, false, true, true) => Ok(PasswordResponse::Terminate),
            (true, false, false, true) => Ok(PasswordResponse::Success { password }),
            (true, true, true, false) => Ok(PasswordResponse::Error { message }),
            _ => Err(ProtocolError::MalformedPayload(format!(
                "PasswordResponse: inconsistent fields (continue={keep_going}, is_error={is_error}, \
                 password_len={}, error_len={})",
                password.len(),
                message.len()
            ))),
        }
    }
}

// ── Utility helpers ───────────────────────────────────────────────────────────

fn encode_flag(value: bool) -> u8 {
    if value {
        0x01
    } else {
        0x00
    }
}

fn decode_flag(byte: u8, field: &str) -> Result<bool, ProtocolError> {
    match byte {
        0x00 => Ok(false),
        0x01 => Ok(true),
        other => Err(ProtocolError::MalformedPayload(format!(
            "{field}: flag byte must be 0x00 or 0x01, got 0x{other:02X}"
        ))),
    }
}

/// Writes `s` followed by NUL padding so that exactly `capacity` bytes are appended.
fn write_fixed_string(
    buf: &mut Vec<u8>,
    s: &str,
    capacity: usize,
    field: &'static str,
) -> Result<(), ProtocolError> {
    let bytes = s.as_bytes();
    if bytes.len() >= capacity {
        return Err(ProtocolError::FieldTooLong {
            field,
            capacity,
            length: bytes.len(),
        });
    }
    if bytes.contains(&0) {
        return Err(ProtocolError::MalformedPayload(format!(
            "{field}: text contains an embedded NUL"
        )));
    }
    buf.extend_from_slice(bytes);
    buf.resize(buf.len() + (capacity - bytes.len()), 0);
    Ok(())
}

/// Reads a NUL-terminated UTF-8 string from the `capacity`-byte field at `offset`.
///
/// Bytes after the first NUL are ignored.
fn read_fixed_string(
    buf: &[u8],
    offset: usize,
    capacity: usize,
    field: &str,
) -> Result<String, ProtocolError> {
    if buf.len() < offset + capacity {
        return Err(ProtocolError::MalformedPayload(format!(
            "{field}: need {capacity} bytes at offset {offset}, got {}",
            buf.len().saturating_sub(offset)
        )));
    }
    let raw = &buf[offset..offset + capacity];
    let end = raw.iter().position(|&b| b == 0).ok_or_else(|| {
        ProtocolError::MalformedPayload(format!("{field}: text is not NUL-terminated"))
    })?;
    let s = std::str::from_utf8(&raw[..end])
        .map_err(|e| ProtocolError::MalformedPayload(format!("{field}: invalid UTF-8: {e}")))?
        .to_string();
    Ok(s)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip<M: WireMessage + std::fmt::Debug>(msg: &M) -> M {
        let encoded = encode_message(msg).expect("encode failed");
        assert_eq!(encoded.len(), M::WIRE_SIZE, "encoded size must be fixed");
        decode_message(&encoded).expect("decode failed")
    }

    // ── MenuMessage ──────────────────────────────────────────────────────────

    #[test]
    fn test_menu_round_trip() {
        let msg = MenuMessage::default();
        assert_eq!(round_trip(&msg), msg);
    }

    #[test]
    fn test_menu_with_max_length_text_round_trip() {
        let msg = MenuMessage::new("m".repeat(MENU_TEXT_CAPACITY - 1));
        assert_eq!(round_trip(&msg), msg);
    }

    #[test]
    fn test_menu_text_at_capacity_is_rejected() {
        let msg = MenuMessage::new("m".repeat(MENU_TEXT_CAPACITY));
        assert!(matches!(
            encode_message(&msg),
            Err(ProtocolError::FieldTooLong { capacity: MENU_TEXT_CAPACITY, .. })
        ));
    }

    // ── PasswordRequest ──────────────────────────────────────────────────────

    #[test]
    fn test_request_layout_puts_selector_first() {
        let bytes = encode_message(&PasswordRequest::new('s', "12")).unwrap();
        assert_eq!(bytes[0], b's');
        assert_eq!(&bytes[1..3], b"12");
        assert!(bytes[3..].iter().all(|&b| b == 0), "length text must be NUL padded");
    }

    #[test]
    fn test_request_with_empty_length_round_trip() {
        let msg = PasswordRequest::new('q', "");
        assert_eq!(round_trip(&msg), msg);
    }

    #[test]
    fn test_request_with_malformed_length_round_trip() {
        let msg = PasswordRequest::new('x', " 12abc ");
        assert_eq!(round_trip(&msg), msg);
    }

    #[test]
    fn test_request_with_non_ascii_selector_is_rejected() {
        let result = encode_message(&PasswordRequest::new('é', "8"));
        assert_eq!(result, Err(ProtocolError::NonAsciiSelector('é')));
    }

    #[test]
    fn test_request_with_nul_selector_byte_fails_to_decode() {
        let bytes = vec![0u8; REQUEST_WIRE_SIZE];
        let result: Result<PasswordRequest, _> = decode_message(&bytes);
        assert_eq!(result, Err(ProtocolError::InvalidSelectorByte(0)));
    }

    #[test]
    fn test_request_ignores_bytes_after_nul() {
        let mut bytes = encode_message(&PasswordRequest::new('n', "8")).unwrap();
        bytes[10] = b'Z';
        let decoded: PasswordRequest = decode_message(&bytes).unwrap();
        assert_eq!(decoded.length_text, "8");
    }

    #[test]
    fn test_request_without_nul_terminator_fails_to_decode() {
        let mut bytes = vec![b'7'; REQUEST_WIRE_SIZE];
        bytes[0] = b'n';
        let result: Result<PasswordRequest, _> = decode_message(&bytes);
        assert!(matches!(result, Err(ProtocolError::MalformedPayload(_))));
    }

    // ── PasswordResponse ─────────────────────────────────────────────────────

    #[test]
    fn test_response_success_round_trip() {
        let msg = PasswordResponse::success("a".repeat(32));
        assert_eq!(round_trip(&msg), msg);
    }

    #[test]
    fn test_response_error_round_trip() {
        let msg = PasswordResponse::error("The length for the password is not valid.\n");
        assert_eq!(round_trip(&msg), msg);
    }

    #[test]
    fn test_response_terminate_round_trip() {
        assert_eq!(round_trip(&PasswordResponse::Terminate), PasswordResponse::Terminate);
    }

    #[test]
    fn test_response_layout_offsets() {
        let bytes = encode_message(&PasswordResponse::error("oops")).unwrap();
        assert_eq!(bytes[0], 0x01, "continue flag");
        assert!(bytes[1..34].iter().all(|&b| b == 0), "password must be empty");
        assert_eq!(bytes[34], 0x01, "is_error flag");
        assert_eq!(&bytes[35..39], b"oops");
    }

    #[test]
    fn test_response_terminate_encodes_to_all_zero() {
        let bytes = encode_message(&PasswordResponse::Terminate).unwrap();
        assert!(bytes.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_response_password_over_capacity_is_rejected() {
        let result = encode_message(&PasswordResponse::success("a".repeat(33)));
        assert!(matches!(result, Err(ProtocolError::FieldTooLong { .. })));
    }

    #[test]
    fn test_response_error_message_over_capacity_is_rejected() {
        let result = encode_message(&PasswordResponse::error("e".repeat(50)));
        assert!(matches!(result, Err(ProtocolError::FieldTooLong { .. })));
    }

    #[test]
    fn test_response_empty_success_is_rejected() {
        let result = encode_message(&PasswordResponse::success(""));
        assert!(matches!(result, Err(ProtocolError::MalformedPayload(_))));
    }

    #[test]
    fn test_response_bad_flag_byte_fails_to_decode() {
        let mut bytes = encode_message(&PasswordResponse::success("abcdef")).unwrap();
        bytes[0] = 0x02;
        let result: Result<PasswordResponse, _> = decode_message(&bytes);
        assert!(matches!(result, Err(ProtocolError::MalformedPayload(_))));
    }

    #[test]
    fn test_response_inconsistent_fields_fail_to_decode() {
        // continue = false but a password is present
        let mut bytes = encode_message(&PasswordResponse::success("abcdef")).unwrap();
        bytes[0] = 0x00;
        let result: Result<PasswordResponse, _> = decode_message(&bytes);
        assert!(matches!(result, Err(ProtocolError::MalformedPayload(_))));
    }

    // ── Error conditions ─────────────────────────────────────────────────────

    #[test]
    fn test_decode_empty_bytes_returns_insufficient_data() {
        let result: Result<PasswordResponse, _> = decode_message(&[]);
        assert_eq!(
            result,
            Err(ProtocolError::InsufficientData {
                needed: RESPONSE_WIRE_SIZE,
                available: 0
            })
        );
    }

    #[test]
    fn test_decode_truncated_request_returns_insufficient_data() {
        let bytes = encode_message(&PasswordRequest::new('n', "8")).unwrap();
        let result: Result<PasswordRequest, _> = decode_message(&bytes[..100]);
        assert!(matches!(result, Err(ProtocolError::InsufficientData { .. })));
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let mut bytes = encode_message(&PasswordResponse::Terminate).unwrap();
        bytes.extend_from_slice(b"next message");
        let decoded: PasswordResponse = decode_message(&bytes).unwrap();
        assert_eq!(decoded, PasswordResponse::Terminate);
    }

    #[test]
    fn test_invalid_utf8_fails_to_decode() {
        let mut bytes = encode_message(&MenuMessage::new("menu")).unwrap();
        bytes[0] = 0xFF;
        let result: Result<MenuMessage, _> = decode_message(&bytes);
        assert!(matches!(result, Err(ProtocolError::MalformedPayload(_))));
    }
}
