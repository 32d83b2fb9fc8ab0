//! Roman numeral rendering.
//!
//! Two encodings are supported:
//! - "old" numerals: purely additive, computed locally (4 is `IIII`)
//! - "modern" numerals: standard subtractive notation, delegated to an
//!   external conversion service (4 is `IV`)

mod client;
mod old;

pub use client::RomanApiClient;
pub use old::old_roman;

use thiserror::Error;

/// Which numeral encoding the display is using.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NumeralMode {
    /// Additive-only numerals, rendered locally.
    #[default]
    Old,
    /// Subtractive numerals, rendered by the conversion service.
    Modern,
}

impl std::fmt::Display for NumeralMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Old => write!(f, "old"),
            Self::Modern => write!(f, "modern"),
        }
    }
}

/// Errors produced while rendering a value as a Roman numeral.
#[derive(Debug, Error)]
pub enum RomanError {
    /// The value has no numeral representation. Only 0-3999 can be shown.
    #[error("value {value} cannot be rendered as a Roman numeral (supported range is 0-3999)")]
    OutOfRange { value: i64 },
    /// The conversion service failed (network error or error payload).
    #[error("Roman numeral conversion failed: {reason}")]
    Conversion { reason: String },
}

impl RomanError {
    /// The message shown to the user when rendering fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::OutOfRange { .. } => {
                "That number is too big!  Only numbers between 1-3999 can be displayed.".to_string()
            }
            Self::Conversion { reason } => {
                format!("Something went wrong computing the Roman numeral.  Sorry!\n\n{reason}")
            }
        }
    }
}

/// Parse a calculator display string into the integer to be rendered.
///
/// Display strings are digit-only, so a parse failure means the magnitude
/// overflows `i64`, which is far outside the renderable range.
pub fn parse_display(value: &str) -> Result<i64, RomanError> {
    value
        .parse::<i64>()
        .map_err(|_| RomanError::OutOfRange { value: i64::MAX })
}
