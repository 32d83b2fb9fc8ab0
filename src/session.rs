//! Calculator session: wires the engine to rendering, history, and storage.
//!
//! Events are applied to the engine synchronously, so the state machine is
//! never blocked on rendering. Old-numeral renders resolve inline; modern
//! renders go through the conversion service on a spawned task. Either way
//! the resolved text is fed back through the engine's generation check, so
//! whichever request was issued last wins and responses for superseded
//! state are dropped. Callers observe display changes through an update
//! channel.

use crate::auth::AuthManager;
use crate::config::AppConfig;
use crate::engine::{CalculatorEngine, CalculatorEvent, RenderRequest};
use crate::history::{History, HistoryEntry};
use crate::roman::{self, NumeralMode, RomanApiClient, RomanError};
use crate::storage::KeyValueStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A display update pushed to the UI.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionUpdate {
    /// Numeral text to show.
    pub display_text: String,
    /// Encoding the text was rendered with.
    pub mode: NumeralMode,
    /// User-facing message when rendering failed and the calculator was
    /// reset.
    pub error: Option<String>,
}

/// One calculator session. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct CalculatorSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    engine: Mutex<CalculatorEngine>,
    history: Mutex<History>,
    client: RomanApiClient,
    store: Arc<dyn KeyValueStore>,
    updates: flume::Sender<SessionUpdate>,
}

impl CalculatorSession {
    /// Create a session over a store, returning it together with the
    /// receiving end of its update channel. Persisted history is loaded if
    /// the store carries a login marker.
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<(Self, flume::Receiver<SessionUpdate>), RomanError> {
        let client = RomanApiClient::new(config)?;
        let history = History::load_from(store.as_ref());
        let (updates, receiver) = flume::unbounded();
        let session = Self {
            inner: Arc::new(SessionInner {
                engine: Mutex::new(CalculatorEngine::new()),
                history: Mutex::new(history),
                client,
                store,
                updates,
            }),
        };
        Ok((session, receiver))
    }

    /// Feed one input event through the state machine.
    ///
    /// Returns once the transition (and any synchronous render) is applied;
    /// a modern-numeral render keeps running on a background task and
    /// reports through the update channel. Must be called from within a
    /// Tokio runtime.
    pub async fn handle_event(&self, event: CalculatorEvent) {
        let step = self.inner.engine.lock().await.apply_event(event);

        let Some(request) = step.render else {
            // No display change. An `=` on a fresh operand still commits.
            if step.commit {
                let entry = self.inner.engine.lock().await.state().current_entry.clone();
                if let Some(entry) = entry {
                    self.inner.commit_entry(entry).await;
                }
            }
            return;
        };

        match request.mode {
            NumeralMode::Old => {
                let result = roman::parse_display(&request.value).and_then(roman::old_roman);
                self.inner.finish_render(request, result, step.commit).await;
            }
            NumeralMode::Modern => {
                let inner = Arc::clone(&self.inner);
                tokio::spawn(async move {
                    let result = match roman::parse_display(&request.value) {
                        Ok(n) => inner.client.modern_roman(n).await,
                        Err(e) => Err(e),
                    };
                    inner.finish_render(request, result, step.commit).await;
                });
            }
        }
    }

    /// The numeral text currently shown.
    pub async fn display_text(&self) -> String {
        self.inner.engine.lock().await.state().display_text.clone()
    }

    /// Snapshot of the committed history, oldest first.
    pub async fn history_entries(&self) -> Vec<HistoryEntry> {
        self.inner
            .history
            .lock()
            .await
            .entries()
            .cloned()
            .collect()
    }

    /// Drop the history, in memory and in the store.
    pub async fn clear_history(&self) {
        self.inner
            .history
            .lock()
            .await
            .clear(self.inner.store.as_ref());
    }

    /// Authentication over the same store this session persists to.
    pub fn auth(&self) -> AuthManager {
        AuthManager::new(Arc::clone(&self.inner.store))
    }
}

impl SessionInner {
    async fn finish_render(
        &self,
        request: RenderRequest,
        result: Result<String, RomanError>,
        commit: bool,
    ) {
        match result {
            Ok(text) => {
                let entry = {
                    let mut engine = self.engine.lock().await;
                    if !engine.apply_render(&request, &text) {
                        return;
                    }
                    if commit {
                        engine.state().current_entry.clone()
                    } else {
                        None
                    }
                };
                if let Some(entry) = entry {
                    self.commit_entry(entry).await;
                }
                let _ = self.updates.send(SessionUpdate {
                    display_text: text,
                    mode: request.mode,
                    error: None,
                });
            }
            Err(err) => {
                if !self.engine.lock().await.handle_render_failure(&request) {
                    return;
                }
                let _ = self.updates.send(SessionUpdate {
                    display_text: "0".to_string(),
                    mode: request.mode,
                    error: Some(err.user_message()),
                });
            }
        }
    }

    async fn commit_entry(&self, entry: HistoryEntry) {
        let mut history = self.history.lock().await;
        history.commit(entry);
        history.save_to(self.store.as_ref());
    }
}
