//! Request validation.
//!
//! Two independent, pure checks run before anything is generated: the selector
//! must name a known class, and the length text must be a plain decimal number
//! inside the configured bounds.  The type check always runs first, so a
//! request with both problems reports the type error.

use thiserror::Error;

use crate::domain::password::{PasswordClass, CLASS_SELECTORS};
use crate::protocol::messages::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

/// Error text sent to the client when the selector is not a class letter.
pub const INVALID_TYPE_MESSAGE: &str = "The type inserted is not valid.\n";

/// Error text sent to the client when the length is malformed or out of bounds.
pub const INVALID_LENGTH_MESSAGE: &str = "The length for the password is not valid.\n";

/// Why a request was rejected.  Recoverable: the session keeps going.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("password type is not valid")]
    InvalidType,
    #[error("password length is not valid")]
    InvalidLength,
}

impl ValidationError {
    /// The fixed message placed in the response's error field.
    pub fn wire_message(self) -> &'static str {
        match self {
            ValidationError::InvalidType => INVALID_TYPE_MESSAGE,
            ValidationError::InvalidLength => INVALID_LENGTH_MESSAGE,
        }
    }
}

/// Rejected [`LengthBounds`] configuration.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoundsError {
    #[error("minimum password length must be at least 1")]
    ZeroMinimum,
    #[error("minimum password length {min} exceeds maximum {max}")]
    Inverted { min: usize, max: usize },
    #[error("maximum password length {max} exceeds the protocol limit of {limit}")]
    ExceedsProtocolLimit { max: usize, limit: usize },
}

/// Inclusive bounds on the requested password length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    min: usize,
    max: usize,
}

impl LengthBounds {
    /// Creates bounds `min..=max`.
    ///
    /// # Errors
    ///
    /// Returns [`BoundsError`] when `min` is zero, `min > max`, or `max` is
    /// larger than the response password field can carry.
    pub fn new(min: usize, max: usize) -> Result<Self, BoundsError> {
        if min == 0 {
            return Err(BoundsError::ZeroMinimum);
        }
        if min > max {
            return Err(BoundsError::Inverted { min, max });
        }
        if max > MAX_PASSWORD_LENGTH {
            return Err(BoundsError::ExceedsProtocolLimit {
                max,
                limit: MAX_PASSWORD_LENGTH,
            });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

impl Default for LengthBounds {
    fn default() -> Self {
        Self {
            min: MIN_PASSWORD_LENGTH,
            max: MAX_PASSWORD_LENGTH,
        }
    }
}

/// Returns `true` if `selector` is one of `allowed`.  Case-sensitive.
pub fn is_valid_selector(allowed: &[char], selector: char) -> bool {
    allowed.contains(&selector)
}

/// Returns `true` if `text` is a non-empty run of ASCII digits whose value is
/// within `min..=max`.
///
/// Whitespace, signs, and numbers too large to represent are all invalid.
pub fn is_valid_length(text: &str, min: usize, max: usize) -> bool {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match text.parse::<usize>() {
        Ok(value) => (min..=max).contains(&value),
        Err(_) => false,
    }
}

/// Validates a raw request and resolves it to a class and length.
///
/// The selector is lower-cased before the class check, so `N` and `n` both
/// mean numeric.
///
/// # Errors
///
/// [`ValidationError::InvalidType`] if the selector is not a class letter,
/// otherwise [`ValidationError::InvalidLength`] if the length text is not
/// within `bounds`.
pub fn validate_request(
    selector: char,
    length_text: &str,
    bounds: LengthBounds,
) -> Result<(PasswordClass, usize), ValidationError> {
    let selector = selector.to_ascii_lowercase();
    if !is_valid_selector(&CLASS_SELECTORS, selector) {
        return Err(ValidationError::InvalidType);
    }
    if !is_valid_length(length_text, bounds.min(), bounds.max()) {
        return Err(ValidationError::InvalidLength);
    }

    let class = PasswordClass::from_selector(selector).ok_or(ValidationError::InvalidType)?;
    let length = length_text
        .parse::<usize>()
        .map_err(|_| ValidationError::InvalidLength)?;
    Ok((class, length))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
