//! Search session state machine.
//!
//! The controller owns the search term, at most one in-flight query, and the
//! published [`ControllerSnapshot`]. Every mutation happens under one lock and
//! is followed by a publish on the watch channel, so observers only ever see
//! whole states.
//!
//! A new search supersedes the previous one: its [`CancellationToken`] is
//! cancelled and the generation counter moves on. A completion whose generation
//! is no longer current is dropped without touching state.

use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    cache::CacheStore,
    error::QueryError,
    model::{ApiFailure, WeatherQueryResult, WeatherSummary},
    provider::WeatherClient,
    view_state::ViewState,
};

/// Everything the presentation layer may read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControllerSnapshot {
    pub current_term: String,
    pub is_loading: bool,
    pub last_summary: Option<WeatherSummary>,
    pub last_error: Option<ApiFailure>,
    pub has_unclassified_error: bool,
    pub view_state: ViewState,
}

#[derive(Debug)]
struct SessionState {
    published: ControllerSnapshot,
    generation: u64,
    active_request: Option<CancellationToken>,
}

impl SessionState {
    fn reproject(&mut self) {
        let p = &self.published;
        self.published.view_state =
            ViewState::project(p.is_loading, p.last_error.as_ref(), p.has_unclassified_error);
    }
}

#[derive(Debug)]
struct Shared {
    state: Mutex<SessionState>,
    updates: watch::Sender<ControllerSnapshot>,
    cache: CacheStore,
}

impl Shared {
    fn publish(&self, state: &SessionState) {
        self.updates.send_replace(state.published.clone());
    }

    /// Apply the outcome of the query started as `generation`.
    ///
    /// Returns `false` when the query was superseded and nothing changed.
    fn complete(
        &self,
        generation: u64,
        outcome: Result<WeatherQueryResult, QueryError>,
    ) -> bool {
        let mut state = self.state.lock();
        if state.generation != generation {
            debug!(generation, current = state.generation, "discarding stale weather result");
            return false;
        }
        state.active_request = None;

        match outcome {
            Ok(WeatherQueryResult::Success(payload)) => {
                let summary = WeatherSummary::from_payload(&payload, Utc::now());
                self.cache.persist(&summary);
                // Publish what the store holds, not the in-memory payload.
                state.published.last_summary = self.cache.load();
                state.published.current_term.clear();
                info!(location = %summary.location_name, "weather query succeeded");
            }
            Ok(WeatherQueryResult::Failure(failure)) => {
                info!(
                    code = ?failure.code,
                    message = ?failure.message,
                    "weather service rejected query"
                );
                state.published.last_summary = None;
                state.published.last_error = Some(failure);
            }
            Err(e) => {
                warn!(error = %e, "weather query failed");
                state.published.last_summary = None;
                state.published.has_unclassified_error = true;
            }
        }

        state.published.is_loading = false;
        state.reproject();
        self.publish(&state);
        true
    }
}

/// Coordinates one search session: query, cache, and derived view state.
#[derive(Debug, Clone)]
pub struct QueryController {
    client: Arc<dyn WeatherClient>,
    shared: Arc<Shared>,
}

impl QueryController {
    /// Seed the session from the cache. A cached summary opens in the detailed view.
    pub fn new(client: Arc<dyn WeatherClient>, cache: CacheStore) -> Self {
        let last_summary = cache.load();
        let view_state =
            if last_summary.is_some() { ViewState::Detailed } else { ViewState::Initial };

        let published = ControllerSnapshot { last_summary, view_state, ..Default::default() };
        let (updates, _) = watch::channel(published.clone());

        Self {
            client,
            shared: Arc::new(Shared {
                state: Mutex::new(SessionState {
                    published,
                    generation: 0,
                    active_request: None,
                }),
                updates,
                cache,
            }),
        }
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        self.shared.state.lock().published.clone()
    }

    /// Receiver that observes every published state from now on.
    pub fn subscribe(&self) -> watch::Receiver<ControllerSnapshot> {
        self.shared.updates.subscribe()
    }

    pub fn view_state(&self) -> ViewState {
        self.shared.state.lock().published.view_state.clone()
    }

    /// Edit the pending search term without issuing a query.
    pub fn set_search_term(&self, term: impl Into<String>) {
        let mut state = self.shared.state.lock();
        state.published.current_term = term.into();
        self.shared.publish(&state);
    }

    /// Search for the pending term.
    pub fn search(&self) -> JoinHandle<()> {
        let term = self.shared.state.lock().published.current_term.clone();
        self.update_values(term)
    }

    /// Start a query for `term`, superseding any query still in flight.
    ///
    /// Must be called from within a tokio runtime. The handle resolves once
    /// the query has been applied or discarded.
    pub fn update_values(&self, term: impl Into<String>) -> JoinHandle<()> {
        let term = term.into();

        let (generation, token) = {
            let mut state = self.shared.state.lock();

            if let Some(previous) = state.active_request.take() {
                previous.cancel();
                debug!(superseded = state.generation, "cancelled in-flight weather query");
            }
            state.generation += 1;
            let token = CancellationToken::new();
            state.active_request = Some(token.clone());

            let published = &mut state.published;
            published.current_term = term.clone();
            published.last_error = None;
            published.has_unclassified_error = false;
            published.is_loading = true;
            state.reproject();
            self.shared.publish(&state);

            (state.generation, token)
        };

        debug!(generation, "issuing weather query");
        let client = Arc::clone(&self.client);
        let shared = Arc::clone(&self.shared);

        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => {
                    debug!(generation, "weather query cancelled before completion");
                    return;
                }
                outcome = client.perform_query(&term) => outcome,
            };
            shared.complete(generation, outcome);
        })
    }

    /// Switch to the detailed view. Does nothing without a summary.
    pub fn expand_to_detail_view(&self) {
        let mut state = self.shared.state.lock();
        if state.published.last_summary.is_none() {
            return;
        }
        state.published.view_state = ViewState::Detailed;
        self.shared.publish(&state);
    }
}
