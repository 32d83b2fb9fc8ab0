//! Calculator state.

use super::OperatorKey;
use crate::history::HistoryEntry;
use crate::roman::NumeralMode;

/// The full state of an in-progress computation.
///
/// There is exactly one instance per session, owned by the engine; all
/// mutation goes through the engine's transition methods.
#[derive(Clone, Debug)]
pub struct CalculatorState {
    /// Decimal digits currently entered, `"0"` or a sequence with no leading
    /// zero. Never negative, never fractional.
    pub display_value: String,
    /// The numeral text last rendered for `display_value`.
    pub display_text: String,
    /// Running result of the chain so far; `None` until the first operator.
    pub accumulated: Option<f64>,
    /// Operator waiting for its right-hand operand.
    pub pending_operator: Option<OperatorKey>,
    /// Set after an operator press; the next digit starts a fresh operand.
    pub awaiting_new_operand: bool,
    /// Numeral encoding currently shown. Typing a digit forces `Old`.
    pub mode: NumeralMode,
    /// The calculation being assembled for the history log.
    pub current_entry: Option<HistoryEntry>,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            display_value: "0".to_string(),
            display_text: "0".to_string(),
            accumulated: None,
            pending_operator: None,
            awaiting_new_operand: false,
            mode: NumeralMode::default(),
            current_entry: None,
        }
    }
}

impl CalculatorState {
    /// True when something other than zero is on the display.
    pub fn display_is_nonzero(&self) -> bool {
        self.display_value != "0"
    }
}
