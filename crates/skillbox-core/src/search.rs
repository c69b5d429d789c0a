//! Debounced, cancellable registry search.
//!
//! [`DebouncedSearch`] takes the live contents of a search box and turns it
//! into at most one registry request per settled query:
//!
//! - input shorter than two characters resolves to an empty result at once;
//! - longer input waits for the debounce delay, restarting on every change;
//! - a newer query cancels the pending timer or the in-flight request, and
//!   a request only commits if no newer input arrived in the meantime.
//!
//! State is published through a [`tokio::sync::watch`] channel.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::SkillsError;
use crate::registry::{SkillSearch, is_searchable};
use crate::skills::Skill;

/// Delay used when none is configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Observable search state.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Trimmed query the state was last committed for
    pub query: String,
    /// Last successful result; kept across failures
    pub data: Option<Arc<Vec<Skill>>>,
    pub is_loading: bool,
    /// Error from the most recent request, cleared on success
    pub error: Option<Arc<SkillsError>>,
    /// Input generation this state reflects
    pub generation: u64,
}

impl SearchState {
    /// Skills from the last successful request, or an empty slice.
    pub fn skills(&self) -> &[Skill] {
        self.data.as_deref().map(Vec::as_slice).unwrap_or_default()
    }
}

#[derive(Debug, Default)]
struct Control {
    /// Bumped on every accepted input or revalidation.
    generation: u64,
    /// Latest qualifying query: scheduled, in flight, or committed.
    target: Option<String>,
    /// Token for the pending timer or in-flight request.
    pending: Option<CancellationToken>,
}

impl Control {
    /// Cancel outstanding work and start a new generation.
    fn supersede(&mut self) -> u64 {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
        self.generation += 1;
        self.generation
    }
}

struct Shared {
    backend: Arc<dyn SkillSearch>,
    control: Mutex<Control>,
    state: watch::Sender<SearchState>,
}

impl Shared {
    fn control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `update` only if `generation` is still current. The check and
    /// the write happen under the same lock.
    fn commit(&self, generation: u64, update: impl FnOnce(&mut SearchState)) -> bool {
        let control = self.control();
        if control.generation != generation {
            return false;
        }
        self.state.send_modify(|state| {
            update(state);
            state.generation = generation;
        });
        true
    }

    async fn run(&self, query: String, generation: u64, token: CancellationToken) {
        let started = self.commit(generation, |state| {
            state.query = query.clone();
            state.is_loading = true;
        });
        if !started {
            return;
        }

        // Dropping the backend future aborts the underlying request.
        let result = tokio::select! {
            _ = token.cancelled() => {
                debug!(%query, "search request cancelled");
                return;
            }
            result = self.backend.search(&query) => result,
        };

        let committed = self.commit(generation, |state| {
            state.is_loading = false;
            match result {
                Ok(skills) => {
                    state.data = Some(Arc::new(skills));
                    state.error = None;
                }
                Err(err) => {
                    debug!(%query, error = %err, "search failed");
                    state.error = Some(Arc::new(err));
                }
            }
        });
        if !committed {
            debug!(%query, "discarding stale search result");
        }
    }
}

/// Debounced search coordinator for one search box.
pub struct DebouncedSearch {
    shared: Arc<Shared>,
    delay: Duration,
}

impl DebouncedSearch {
    pub fn new(backend: Arc<dyn SkillSearch>, delay: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            shared: Arc::new(Shared {
                backend,
                control: Mutex::new(Control::default()),
                state,
            }),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Feed the current search box contents.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn set_query(&self, input: &str) {
        let query = input.trim();
        let mut control = self.shared.control();

        if !is_searchable(query) {
            let generation = control.supersede();
            control.target = None;
            self.shared.state.send_modify(|state| {
                state.query = query.to_string();
                state.data = Some(Arc::new(Vec::new()));
                state.is_loading = false;
                state.error = None;
                state.generation = generation;
            });
            return;
        }

        if control.target.as_deref() == Some(query) {
            return;
        }

        let generation = control.supersede();
        let token = CancellationToken::new();
        control.target = Some(query.to_string());
        control.pending = Some(token.clone());
        drop(control);

        self.spawn(query.to_string(), generation, token, Some(self.delay));
    }

    /// Re-issue the request for the current query immediately, skipping
    /// the debounce delay. Does nothing when there is no searchable query.
    pub fn revalidate(&self) {
        let mut control = self.shared.control();
        let Some(query) = control.target.clone() else {
            return;
        };

        let generation = control.supersede();
        let token = CancellationToken::new();
        control.pending = Some(token.clone());
        drop(control);

        self.spawn(query, generation, token, None);
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchState {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.shared.state.subscribe()
    }

    /// Wait until the latest input has been fully resolved (debounce
    /// elapsed and request finished) and return the resulting state.
    pub async fn settled(&self) -> SearchState {
        let mut rx = self.subscribe();
        loop {
            {
                let control = self.shared.control();
                let state = rx.borrow_and_update();
                if !state.is_loading && state.generation == control.generation {
                    return state.clone();
                }
            }
            if rx.changed().await.is_err() {
                return self.state();
            }
        }
    }

    fn spawn(
        &self,
        query: String,
        generation: u64,
        token: CancellationToken,
        delay: Option<Duration>,
    ) {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            if let Some(delay) = delay {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!(%query, "debounce timer discarded");
                        return;
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            shared.run(query, generation, token).await;
        });
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        self.shared.control().supersede();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_supersede_cancels_pending_token() {
        let mut control = Control::default();
        let token = CancellationToken::new();
        control.pending = Some(token.clone());

        assert_eq!(control.supersede(), 1);
        assert!(token.is_cancelled());
        assert!(control.pending.is_none());
    }

    #[test]
    fn empty_state_has_no_skills() {
        let state = SearchState::default();
        assert!(state.skills().is_empty());
        assert!(!state.is_loading);
    }
}
