//! Calculator state machine.
//!
//! This module provides:
//! - the operator keys and their arithmetic
//! - the calculator state value object
//! - the engine owning that state and its event-driven transitions

mod machine;
mod operator;
mod state;

pub use machine::{CalculatorEngine, CalculatorEvent, EngineStep, RenderRequest};
pub use operator::OperatorKey;
pub use state::CalculatorState;
