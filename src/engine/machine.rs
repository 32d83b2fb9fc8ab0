//! The calculator state machine.
//!
//! Key presses map 1:1 onto [`CalculatorEvent`]s; every transition runs to
//! completion synchronously and reports what the caller must do next via an
//! [`EngineStep`]: re-render the display, commit the finished calculation to
//! history, or both.
//!
//! Rendering is asynchronous from the engine's point of view. Each state
//! change that affects the display bumps a generation counter, and
//! [`RenderRequest`]s carry the generation they were snapshotted from. A
//! response whose generation no longer matches is discarded, so an in-flight
//! conversion can never clobber a display it no longer corresponds to.

use super::{CalculatorState, OperatorKey};
use crate::history::HistoryEntry;
use crate::roman::NumeralMode;
use tracing::{debug, warn};

/// Input events driving the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalculatorEvent {
    /// A digit key, 0-9.
    Digit(u8),
    /// An operator key.
    Operator(OperatorKey),
    /// An old/modern mode key.
    Mode(NumeralMode),
    /// The clear key: soft-clears a non-zero display, hard-clears otherwise.
    ClearKey,
    /// Unconditional hard clear.
    ClearAll,
}

/// Snapshot of the display state a render was requested for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderRequest {
    /// The decimal value to render.
    pub value: String,
    /// The encoding to render with.
    pub mode: NumeralMode,
    /// Generation the snapshot was taken at.
    pub generation: u64,
}

/// What a transition asks of its caller.
#[derive(Debug, Default)]
pub struct EngineStep {
    /// Render this snapshot and feed the text back via
    /// [`CalculatorEngine::apply_render`]. `None` when the display content
    /// did not change.
    pub render: Option<RenderRequest>,
    /// Commit the current history entry once the render (if any) resolves.
    pub commit: bool,
}

/// Which part of the in-progress history entry the next applied render
/// should refresh with the rendered text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum EntryRefresh {
    #[default]
    None,
    /// Replace the whole entry (a chain restarted after `=`).
    Fresh,
    /// Update only the result text.
    Result,
}

/// Single owner of [`CalculatorState`].
#[derive(Debug, Default)]
pub struct CalculatorEngine {
    state: CalculatorState,
    generation: u64,
    entry_refresh: EntryRefresh,
}

/// Truncate toward zero and clamp to a minimum of 0 so the result is always
/// renderable-shaped. NaN and infinities collapse to 0 as well, so division
/// by zero completes as a normal calculation instead of resetting the chain.
fn settle(value: f64) -> f64 {
    let value = value.trunc().max(0.0);
    if !value.is_finite() {
        return 0.0;
    }
    // Normalize -0.0 so formatting never shows a sign.
    if value == 0.0 { 0.0 } else { value }
}

/// Format a settled value as the display's decimal string.
fn format_value(value: f64) -> String {
    value.to_string()
}

impl CalculatorEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// Dispatch an input event to its transition.
    pub fn apply_event(&mut self, event: CalculatorEvent) -> EngineStep {
        match event {
            CalculatorEvent::Digit(digit) => EngineStep {
                render: self.press_digit(digit),
                commit: false,
            },
            CalculatorEvent::Operator(op) => self.press_operator(op),
            CalculatorEvent::Mode(mode) => EngineStep {
                render: Some(self.set_mode(mode)),
                commit: false,
            },
            CalculatorEvent::ClearKey => EngineStep {
                render: Some(self.press_clear()),
                commit: false,
            },
            CalculatorEvent::ClearAll => EngineStep {
                render: Some(self.clear_all()),
                commit: false,
            },
        }
    }

    /// Enter a digit. Starts a fresh operand after an operator press,
    /// otherwise appends (replacing a lone `"0"`). Typing always snaps the
    /// display back to old numerals.
    pub fn press_digit(&mut self, digit: u8) -> Option<RenderRequest> {
        if digit > 9 {
            warn!(digit, "ignoring out-of-range digit");
            return None;
        }
        let digit = digit.to_string();

        if self.state.awaiting_new_operand {
            self.state.display_value = digit;
            self.state.awaiting_new_operand = false;
        } else if self.state.display_value == "0" {
            self.state.display_value = digit;
        } else {
            self.state.display_value.push_str(&digit);
        }

        self.state.mode = NumeralMode::Old;
        self.bump();
        Some(self.render_request())
    }

    /// Press an operator key.
    pub fn press_operator(&mut self, op: OperatorKey) -> EngineStep {
        let input_value: f64 = self.state.display_value.parse().unwrap_or(0.0);
        let input_text = self.state.display_text.clone();
        let mut render = None;

        if self.state.accumulated.is_none() {
            // First operator of a chain: latch the operand and open a
            // provisional history entry for it.
            self.state.accumulated = Some(input_value);
            self.state.current_entry =
                Some(HistoryEntry::new(input_text.clone(), input_text.clone()));
            debug!(value = input_value, "chain started");
        } else if let Some(pending) = self.state.pending_operator {
            let current_value = self.state.accumulated.unwrap_or(0.0);
            let new_value = settle(pending.apply(current_value, input_value));

            self.state.accumulated = Some(new_value);
            self.state.display_value = format_value(new_value);
            self.bump();
            debug!(operator = %pending, result = new_value, "operator applied");

            // The entry's rendered texts are provisional until the display
            // render for the new value resolves.
            if pending == OperatorKey::Equals {
                self.state.current_entry = Some(HistoryEntry::new(
                    self.state.display_value.clone(),
                    self.state.display_value.clone(),
                ));
                self.entry_refresh = EntryRefresh::Fresh;
            } else {
                if let Some(entry) = self.state.current_entry.as_mut() {
                    entry.expression =
                        format!("{} {} {}", entry.expression, pending.glyph(), input_text);
                    entry.result = self.state.display_value.clone();
                }
                self.entry_refresh = EntryRefresh::Result;
            }
            render = Some(self.render_request());
        }

        self.state.awaiting_new_operand = true;
        self.state.pending_operator = Some(op);

        EngineStep {
            render,
            commit: op == OperatorKey::Equals,
        }
    }

    /// Switch the numeral encoding and request a re-render.
    pub fn set_mode(&mut self, mode: NumeralMode) -> RenderRequest {
        self.state.mode = mode;
        self.bump();
        self.render_request()
    }

    /// The clear key: soft clear while something is displayed, hard clear
    /// when the display already reads zero.
    pub fn press_clear(&mut self) -> RenderRequest {
        if self.state.display_is_nonzero() {
            self.clear_display()
        } else {
            self.clear_all()
        }
    }

    /// Reset only the displayed value, preserving the chain.
    pub fn clear_display(&mut self) -> RenderRequest {
        self.state.display_value = "0".to_string();
        self.bump();
        self.render_request()
    }

    /// Reset the whole computation. The numeral mode survives, matching the
    /// mode keys staying wherever the user left them.
    pub fn clear_all(&mut self) -> RenderRequest {
        let mode = self.state.mode;
        self.state = CalculatorState {
            mode,
            ..CalculatorState::default()
        };
        self.bump();
        debug!("calculator cleared");
        self.render_request()
    }

    /// Feed a resolved render back into the engine.
    ///
    /// Returns `false` (and changes nothing) when the request was computed
    /// from a superseded state.
    pub fn apply_render(&mut self, request: &RenderRequest, text: &str) -> bool {
        if request.generation != self.generation {
            debug!(
                request_generation = request.generation,
                current_generation = self.generation,
                "discarding stale render"
            );
            return false;
        }
        self.state.display_text = text.to_string();

        match std::mem::take(&mut self.entry_refresh) {
            EntryRefresh::Fresh => {
                self.state.current_entry = Some(HistoryEntry::new(text, text));
            }
            EntryRefresh::Result => {
                if let Some(entry) = self.state.current_entry.as_mut() {
                    entry.result = text.to_string();
                }
            }
            EntryRefresh::None => {}
        }
        true
    }

    /// React to a failed render: hard-clear so the calculator lands in a
    /// known-good state instead of showing half-applied output. A failure
    /// for a superseded request is ignored like any other stale response.
    pub fn handle_render_failure(&mut self, request: &RenderRequest) -> bool {
        if request.generation != self.generation {
            debug!("discarding stale render failure");
            return false;
        }
        self.clear_all();
        true
    }

    fn render_request(&self) -> RenderRequest {
        RenderRequest {
            value: self.state.display_value.clone(),
            mode: self.state.mode,
            generation: self.generation,
        }
    }

    /// Any state change that affects the display invalidates outstanding
    /// renders and any pending entry refresh tied to them.
    fn bump(&mut self) {
        self.generation += 1;
        self.entry_refresh = EntryRefresh::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive the engine resolving renders synchronously with old numerals,
    /// the way the session does for `NumeralMode::Old`.
    fn press(engine: &mut CalculatorEngine, event: CalculatorEvent) -> EngineStep {
        let step = engine.apply_event(event);
        if let Some(request) = &step.render {
            let n = crate::roman::parse_display(&request.value).unwrap();
            let text = crate::roman::old_roman(n).unwrap();
            engine.apply_render(request, &text);
        }
        step
    }

    fn digits(engine: &mut CalculatorEngine, value: &str) {
        for c in value.chars() {
            press(engine, CalculatorEvent::Digit(c as u8 - b'0'));
        }
    }

    fn op(engine: &mut CalculatorEngine, key: &str) -> EngineStep {
        press(
            engine,
            CalculatorEvent::Operator(OperatorKey::from_key(key).unwrap()),
        )
    }

    #[test]
    fn test_digit_entry_replaces_leading_zero() {
        let mut engine = CalculatorEngine::new();
        press(&mut engine, CalculatorEvent::Digit(0));
        assert_eq!(engine.state().display_value, "0");

        digits(&mut engine, "107");
        assert_eq!(engine.state().display_value, "107");
        assert_eq!(engine.state().display_text, "CVII");
    }

    #[test]
    fn test_digit_after_operator_starts_fresh_operand() {
        let mut engine = CalculatorEngine::new();
        digits(&mut engine, "12");
        op(&mut engine, "+");
        assert!(engine.state().awaiting_new_operand);

        digits(&mut engine, "3");
        assert_eq!(engine.state().display_value, "3");
        assert!(!engine.state().awaiting_new_operand);
    }

    #[test]
    fn test_digit_forces_old_mode() {
        let mut engine = CalculatorEngine::new();
        engine.set_mode(NumeralMode::Modern);
        assert_eq!(engine.state().mode, NumeralMode::Modern);

        press(&mut engine, CalculatorEvent::Digit(5));
        assert_eq!(engine.state().mode, NumeralMode::Old);
    }

    #[test]
    fn test_addition_chain() {
        let mut engine = CalculatorEngine::new();
        digits(&mut engine, "1");
        op(&mut engine, "+");
        digits(&mut engine, "2");
        let step = op(&mut engine, "=");

        assert!(step.commit);
        assert_eq!(engine.state().display_value, "3");
        assert_eq!(engine.state().display_text, "III");
        assert_eq!(
            engine.state().current_entry,
            Some(HistoryEntry::new("I + II", "III"))
        );
    }

    #[test]
    fn test_chained_operators_apply_left_to_right() {
        let mut engine = CalculatorEngine::new();
        digits(&mut engine, "2");
        op(&mut engine, "+");
        digits(&mut engine, "3");
        op(&mut engine, "×");
        // 2 + 3 applied when × is pressed.
        assert_eq!(engine.state().display_value, "5");

        digits(&mut engine, "4");
        op(&mut engine, "=");
        assert_eq!(engine.state().display_value, "20");
        assert_eq!(
            engine.state().current_entry,
            Some(HistoryEntry::new("II + III × IIII", "XX"))
        );
    }

    #[test]
    fn test_repeat_equals_is_idempotent() {
        let mut engine = CalculatorEngine::new();
        digits(&mut engine, "7");
        op(&mut engine, "=");
        let display = engine.state().display_value.clone();
        let accumulated = engine.state().accumulated;

        op(&mut engine, "=");
        op(&mut engine, "=");
        assert_eq!(engine.state().display_value, display);
        assert_eq!(engine.state().accumulated, accumulated);
    }

    #[test]
    fn test_equals_restarts_history_entry() {
        let mut engine = CalculatorEngine::new();
        digits(&mut engine, "2");
        op(&mut engine, "+");
        digits(&mut engine, "3");
        op(&mut engine, "=");
        // Continuing after = begins a fresh expression from the result.
        op(&mut engine, "+");
        digits(&mut engine, "4");
        op(&mut engine, "=");
        assert_eq!(
            engine.state().current_entry,
            Some(HistoryEntry::new("V + IIII", "VIIII"))
        );
    }

    #[test]
    fn test_division_truncates_toward_zero() {
        let mut engine = CalculatorEngine::new();
        digits(&mut engine, "7");
        op(&mut engine, "÷");
        digits(&mut engine, "2");
        op(&mut engine, "=");
        assert_eq!(engine.state().display_value, "3");
    }

    #[test]
    fn test_negative_results_clamp_to_zero() {
        let mut engine = CalculatorEngine::new();
        digits(&mut engine, "1");
        op(&mut engine, "−");
        digits(&mut engine, "5");
        op(&mut engine, "=");
        assert_eq!(engine.state().display_value, "0");
        assert_eq!(engine.state().display_text, "0");
    }

    #[test]
    fn test_division_by_zero_settles_to_zero() {
        let mut engine = CalculatorEngine::new();
        digits(&mut engine, "5");
        op(&mut engine, "÷");
        digits(&mut engine, "0");
        let step = op(&mut engine, "=");

        assert!(step.commit);
        assert_eq!(engine.state().display_value, "0");
        assert_eq!(engine.state().display_text, "0");
        // Still a committed calculation, not a cleared chain.
        assert!(engine.state().current_entry.is_some());
    }

    #[test]
    fn test_zero_divided_by_zero_settles_to_zero() {
        let mut engine = CalculatorEngine::new();
        digits(&mut engine, "0");
        op(&mut engine, "÷");
        press(&mut engine, CalculatorEvent::Digit(0));
        op(&mut engine, "=");
        assert_eq!(engine.state().display_value, "0");
    }

    #[test]
    fn test_operator_with_no_prior_digit_latches_zero() {
        let mut engine = CalculatorEngine::new();
        let step = op(&mut engine, "+");
        assert!(step.render.is_none());
        assert_eq!(engine.state().accumulated, Some(0.0));
        assert_eq!(
            engine.state().current_entry,
            Some(HistoryEntry::new("0", "0"))
        );
    }

    #[test]
    fn test_equals_as_first_operator_commits_operand() {
        let mut engine = CalculatorEngine::new();
        digits(&mut engine, "5");
        let step = op(&mut engine, "=");
        assert!(step.commit);
        assert!(step.render.is_none());
        assert_eq!(
            engine.state().current_entry,
            Some(HistoryEntry::new("V", "V"))
        );
    }

    #[test]
    fn test_clear_key_soft_then_hard() {
        let mut engine = CalculatorEngine::new();
        digits(&mut engine, "8");
        op(&mut engine, "+");
        digits(&mut engine, "2");

        // Soft clear: display resets, chain survives.
        press(&mut engine, CalculatorEvent::ClearKey);
        assert_eq!(engine.state().display_value, "0");
        assert_eq!(engine.state().accumulated, Some(8.0));
        assert!(engine.state().pending_operator.is_some());

        // Display is zero now, so the same key hard-clears.
        press(&mut engine, CalculatorEvent::ClearKey);
        assert_eq!(engine.state().accumulated, None);
        assert_eq!(engine.state().pending_operator, None);
        assert!(engine.state().current_entry.is_none());
    }

    #[test]
    fn test_clear_all_preserves_mode() {
        let mut engine = CalculatorEngine::new();
        engine.set_mode(NumeralMode::Modern);
        engine.clear_all();
        assert_eq!(engine.state().mode, NumeralMode::Modern);
        assert_eq!(engine.state().display_value, "0");
        assert_eq!(engine.state().display_text, "0");
    }

    #[test]
    fn test_stale_render_is_discarded() {
        let mut engine = CalculatorEngine::new();
        let step = engine.apply_event(CalculatorEvent::Digit(5));
        let first = step.render.unwrap();

        // A second digit supersedes the first render before it resolves.
        let step = engine.apply_event(CalculatorEvent::Digit(0));
        let second = step.render.unwrap();

        assert!(!engine.apply_render(&first, "V"));
        assert_eq!(engine.state().display_text, "0");

        assert!(engine.apply_render(&second, "L"));
        assert_eq!(engine.state().display_text, "L");
    }

    #[test]
    fn test_stale_render_failure_does_not_clear() {
        let mut engine = CalculatorEngine::new();
        let step = engine.apply_event(CalculatorEvent::Digit(5));
        let first = step.render.unwrap();
        let step = engine.apply_event(CalculatorEvent::Digit(0));
        let second = step.render.unwrap();

        assert!(!engine.handle_render_failure(&first));
        assert_eq!(engine.state().display_value, "50");

        assert!(engine.handle_render_failure(&second));
        assert_eq!(engine.state().display_value, "0");
        assert_eq!(engine.state().accumulated, None);
    }

    #[test]
    fn test_render_failure_resets_to_initial_state() {
        let mut engine = CalculatorEngine::new();
        digits(&mut engine, "12");
        op(&mut engine, "+");
        let step = engine.apply_event(CalculatorEvent::Digit(9));
        let request = step.render.unwrap();

        assert!(engine.handle_render_failure(&request));
        assert_eq!(engine.state().display_value, "0");
        assert_eq!(engine.state().display_text, "0");
        assert_eq!(engine.state().accumulated, None);
        assert!(!engine.state().awaiting_new_operand);
    }

    #[test]
    fn test_out_of_range_digit_is_ignored() {
        let mut engine = CalculatorEngine::new();
        assert!(engine.press_digit(12).is_none());
        assert_eq!(engine.state().display_value, "0");
    }
}
