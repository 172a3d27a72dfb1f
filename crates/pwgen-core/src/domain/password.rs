//! Password classes and the random generators behind them.
//!
//! | Class   | Selector | Alphabet                                              |
//! |---------|----------|-------------------------------------------------------|
//! | Numeric | `n`      | `0-9`                                                 |
//! | Alpha   | `a`      | `a-z`                                                 |
//! | Mixed   | `m`      | `0-9` or `a-z`, sub-alphabet picked 50/50 per character |
//! | Secure  | `s`      | `a-z`, `A-Z`, `0-9`, `!@#$%^&*()` as one flat set     |
//!
//! Characters come from `rand`'s thread-local generator.  pwgen is not a
//! security product; a deployment that needs a stronger source can plug its
//! own [`PasswordGenerator`] into the server.

use rand::Rng;

const DIGITS: &[u8] = b"0123456789";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const SECURE: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()";

/// Selector letters of every password class, in menu order.
pub const CLASS_SELECTORS: [char; 4] = ['n', 'a', 'm', 's'];

/// The closed set of password classes a client may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordClass {
    /// Digits only.
    Numeric,
    /// Lowercase letters only.
    Alpha,
    /// Digits and lowercase letters.
    Mixed,
    /// Lowercase, uppercase, digits, and symbols.
    Secure,
}

impl PasswordClass {
    /// All classes, in menu order.
    pub const ALL: [PasswordClass; 4] = [
        PasswordClass::Numeric,
        PasswordClass::Alpha,
        PasswordClass::Mixed,
        PasswordClass::Secure,
    ];

    /// Maps a lowercase selector letter to its class.
    ///
    /// Matching is exact: callers normalise case first.
    pub fn from_selector(selector: char) -> Option<Self> {
        match selector {
            'n' => Some(PasswordClass::Numeric),
            'a' => Some(PasswordClass::Alpha),
            'm' => Some(PasswordClass::Mixed),
            's' => Some(PasswordClass::Secure),
            _ => None,
        }
    }

    /// The selector letter for this class.
    pub fn selector(self) -> char {
        match self {
            PasswordClass::Numeric => 'n',
            PasswordClass::Alpha => 'a',
            PasswordClass::Mixed => 'm',
            PasswordClass::Secure => 's',
        }
    }

    /// Returns `true` if `c` can appear in a password of this class.
    pub fn contains(self, c: char) -> bool {
        if !c.is_ascii() {
            return false;
        }
        let b = c as u8;
        match self {
            PasswordClass::Numeric => DIGITS.contains(&b),
            PasswordClass::Alpha => LOWERCASE.contains(&b),
            PasswordClass::Mixed => DIGITS.contains(&b) || LOWERCASE.contains(&b),
            PasswordClass::Secure => SECURE.contains(&b),
        }
    }
}

/// Source of generated passwords.
///
/// The server depends on this trait rather than on [`RandomPasswordGenerator`]
/// so sessions can be driven with a deterministic implementation in tests.
pub trait PasswordGenerator: Send + Sync {
    /// Returns a password of exactly `length` characters from `class`'s alphabet.
    ///
    /// `length` has already been validated.
    fn generate(&self, class: PasswordClass, length: usize) -> String;
}

/// The production generator, backed by `rand::thread_rng()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPasswordGenerator;

impl PasswordGenerator for RandomPasswordGenerator {
    fn generate(&self, class: PasswordClass, length: usize) -> String {
        generate_password(class, length)
    }
}

/// Generates a password of exactly `length` characters for `class`.
///
/// Each character is drawn independently.  Never fails; a `length` of zero
/// yields an empty string.
pub fn generate_password(class: PasswordClass, length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let alphabet = match class {
                PasswordClass::Numeric => DIGITS,
                PasswordClass::Alpha => LOWERCASE,
                // Not a flat union: the sub-alphabet is a coin flip first.
                PasswordClass::Mixed => {
                    if rng.gen_bool(0.5) {
                        LOWERCASE
                    } else {
                        DIGITS
                    }
                }
                PasswordClass::Secure => SECURE,
            };
            alphabet[rng.gen_range(0..alphabet.len())] as char
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
