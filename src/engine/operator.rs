//! Operator keys and their arithmetic.

/// An operator key on the calculator pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatorKey {
    Divide,
    Multiply,
    Add,
    Subtract,
    /// Pass-through: applying `=` yields the right-hand operand unchanged,
    /// which is what makes repeated `=` presses idempotent.
    Equals,
}

impl OperatorKey {
    /// Map a key label to an operator. Accepts both the pad glyphs
    /// (`÷ × + − =`) and their ASCII aliases (`/ * -`).
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "÷" | "/" => Some(Self::Divide),
            "×" | "*" => Some(Self::Multiply),
            "+" => Some(Self::Add),
            "−" | "-" => Some(Self::Subtract),
            "=" => Some(Self::Equals),
            _ => None,
        }
    }

    /// The glyph shown on the key and used in history expressions.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Divide => "÷",
            Self::Multiply => "×",
            Self::Add => "+",
            Self::Subtract => "−",
            Self::Equals => "=",
        }
    }

    /// Apply the operator to two operands.
    ///
    /// Division follows IEEE semantics, so dividing by zero produces an
    /// infinity (or NaN for 0 ÷ 0); the caller decides how to settle those.
    pub fn apply(&self, prev_value: f64, next_value: f64) -> f64 {
        match self {
            Self::Divide => prev_value / next_value,
            Self::Multiply => prev_value * next_value,
            Self::Add => prev_value + next_value,
            Self::Subtract => prev_value - next_value,
            Self::Equals => next_value,
        }
    }
}

impl std::fmt::Display for OperatorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glyph())
    }
}
