//! Email and password validation for registration.
//!
//! These checks are informational: they report which criteria a candidate
//! fails so the caller can show a precise message, and never abort anything.

use lazy_static::lazy_static;
use regex::Regex;

/// Symbols a password may (and must, once) contain.
const PASSWORD_SYMBOLS: &str = "!@#$%^&*";

lazy_static! {
    /// Matches most everyday email addresses. A simplified structure, not
    /// full RFC 5322; from Goyvaerts & Levithan, "Regular Expressions
    /// Cookbook".
    static ref EMAIL: Regex = Regex::new(
        r"(?i)^[\w!#$%&'*+/=?`{|}~^-]+(?:\.[\w!#$%&'*+/=?`{|}~^-]+)*@(?:[a-z0-9-]+\.)+[a-z]{2,6}$"
    )
    .unwrap();
}

/// Per-criterion result of password verification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PasswordCheck {
    /// All criteria below hold.
    pub pass: bool,
    /// At least 8 characters.
    pub length: bool,
    /// At least one lowercase letter.
    pub lowercase: bool,
    /// At least one uppercase letter.
    pub uppercase: bool,
    /// At least one decimal digit.
    pub digit: bool,
    /// At least one of `!@#$%^&*`.
    pub symbol: bool,
    /// No characters outside letters, digits, and the symbols above.
    pub no_invalid: bool,
}

/// Check whether an email address looks structurally valid.
pub fn verify_email(email: &str) -> bool {
    !email.is_empty() && EMAIL.is_match(email)
}

/// Verify a password against every criterion individually.
pub fn verify_password(password: &str) -> PasswordCheck {
    if password.is_empty() {
        return PasswordCheck::default();
    }

    let mut check = PasswordCheck {
        length: password.chars().count() >= 8,
        lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
        uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
        digit: password.chars().any(|c| c.is_ascii_digit()),
        symbol: password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)),
        no_invalid: password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c)),
        pass: false,
    };
    check.pass = check.length
        && check.lowercase
        && check.uppercase
        && check.digit
        && check.symbol
        && check.no_invalid;
    check
}
