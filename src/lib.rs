//! A calculator that displays its results as Roman numerals.
//!
//! The crate is the UI-independent core of the app: a key-press driven
//! state machine ([`engine`]), two numeral encodings ([`roman`]) (the
//! additive "old" style computed locally and the subtractive "modern" style
//! fetched from a conversion service), a capped calculation history
//! ([`history`]) persisted through an abstract key-value store
//! ([`storage`]), and the fake registration/login layer ([`auth`]) that
//! gates persistence. [`session`] ties them together and deals with the
//! asynchrony of modern-numeral rendering: stale conversions are discarded
//! instead of clobbering a display that has since moved on.

pub mod auth;
pub mod config;
pub mod engine;
pub mod history;
pub mod roman;
pub mod session;
pub mod storage;

pub use auth::{AuthError, AuthManager, PasswordCheck};
pub use config::AppConfig;
pub use engine::{CalculatorEngine, CalculatorEvent, CalculatorState, OperatorKey, RenderRequest};
pub use history::{HISTORY_CAP, History, HistoryEntry};
pub use roman::{NumeralMode, RomanApiClient, RomanError, old_roman};
pub use session::{CalculatorSession, SessionUpdate};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
