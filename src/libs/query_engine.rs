//! Task query engine.
//!
//! [`TaskQuery`] fetches one page of tasks for a [`QueryParams`] tuple and
//! keeps the most recent result as a [`QueryStatus`]. It does no caching
//! beyond that result: every run issues a fresh request.
//!
//! ## Last request wins
//!
//! Each run takes a ticket with a generation number before its request is
//! sent. When the response arrives it is only stored if no newer run has
//! started in the meantime; otherwise it is discarded as superseded.
//!
//! ## Driving
//!
//! The engine is disabled while the session holds no credential. The
//! [`QueryDriver`] re-runs it whenever the view publishes a new parameter
//! tuple or the login status changes, and never before the view is
//! hydrated. Callers that need the page for the current view wait on
//! [`TaskQuery::wait_for`] instead of fetching themselves.

use super::query::QueryParams;
use super::session::SessionStore;
use super::task::{Pagination, TaskPage};
use super::view_state::ViewState;
use crate::api::{ApiError, TasksApi};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
    /// No session credential.
    Disabled,
    /// Nothing requested yet.
    Idle,
    Loading,
    Ready(TaskPage),
    Failed(ApiError),
}

/// Result of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Disabled,
    /// A newer run started before this one completed; its result was dropped.
    Superseded,
    Loaded(TaskPage),
    Failed(ApiError),
}

impl From<QueryStatus> for QueryOutcome {
    fn from(status: QueryStatus) -> Self {
        match status {
            QueryStatus::Disabled => QueryOutcome::Disabled,
            QueryStatus::Ready(page) => QueryOutcome::Loaded(page),
            QueryStatus::Failed(err) => QueryOutcome::Failed(err),
            QueryStatus::Idle | QueryStatus::Loading => QueryOutcome::Superseded,
        }
    }
}

/// Claim on the current generation, taken before the request is sent.
#[derive(Debug, Clone)]
pub struct QueryTicket {
    generation: u64,
    params: QueryParams,
}

#[derive(Debug)]
struct QueryState {
    generation: u64,
    params: Option<QueryParams>,
    status: QueryStatus,
}

pub struct TaskQuery {
    api: TasksApi,
    state: Mutex<QueryState>,
    /// Ticks on every state transition.
    updates: watch::Sender<()>,
}

impl TaskQuery {
    pub fn new(api: TasksApi) -> Self {
        Self {
            api,
            state: Mutex::new(QueryState {
                generation: 0,
                params: None,
                status: QueryStatus::Idle,
            }),
            updates: watch::channel(()).0,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.api.client().session()
    }

    /// Fetches one page without touching the stored state.
    pub async fn fetch_page(&self, params: &QueryParams) -> Result<TaskPage, ApiError> {
        self.api.get_all(params).await
    }

    /// Fetches `params` and stores the result unless a newer run superseded it.
    pub async fn run(&self, params: QueryParams) -> QueryOutcome {
        match self.begin(params) {
            Some(ticket) => self.finish(ticket).await,
            None => QueryOutcome::Disabled,
        }
    }

    /// Starts a run; `None` while logged out.
    pub fn begin(&self, params: QueryParams) -> Option<QueryTicket> {
        if !self.session().is_logged_in() {
            self.disable();
            return None;
        }

        let ticket = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.params = Some(params.clone());
            state.status = QueryStatus::Loading;
            QueryTicket {
                generation: state.generation,
                params,
            }
        };
        self.updates.send_replace(());
        Some(ticket)
    }

    pub async fn finish(&self, ticket: QueryTicket) -> QueryOutcome {
        let result = self.fetch_page(&ticket.params).await;

        let outcome = {
            let mut state = self.state.lock();
            if state.generation != ticket.generation {
                debug!(
                    generation = ticket.generation,
                    current = state.generation,
                    "discarding superseded task page"
                );
                return QueryOutcome::Superseded;
            }

            match result {
                Ok(page) => {
                    state.status = QueryStatus::Ready(page.clone());
                    QueryOutcome::Loaded(page)
                }
                Err(err) => {
                    state.status = QueryStatus::Failed(err.clone());
                    QueryOutcome::Failed(err)
                }
            }
        };
        self.updates.send_replace(());
        outcome
    }

    /// Waits until the run for `params` has completed, or the engine is
    /// disabled, and returns the resulting status.
    pub async fn wait_for(&self, params: &QueryParams) -> QueryStatus {
        self.wait_until(|state| match state.status {
            QueryStatus::Disabled => true,
            QueryStatus::Ready(_) | QueryStatus::Failed(_) => state.params.as_ref() == Some(params),
            QueryStatus::Idle | QueryStatus::Loading => false,
        })
        .await
    }

    /// Waits until no run is in flight.
    pub async fn settled(&self) -> QueryStatus {
        self.wait_until(|state| state.status != QueryStatus::Loading).await
    }

    async fn wait_until(&self, done: impl Fn(&QueryState) -> bool) -> QueryStatus {
        let mut updates = self.updates.subscribe();
        loop {
            {
                let state = self.state.lock();
                if done(&state) {
                    return state.status.clone();
                }
            }
            if updates.changed().await.is_err() {
                return self.status();
            }
        }
    }

    /// Marks the engine disabled and drops any in-flight result.
    pub fn disable(&self) {
        let changed = {
            let mut state = self.state.lock();
            let changed = state.status != QueryStatus::Disabled;
            if changed {
                state.generation += 1;
                state.params = None;
                state.status = QueryStatus::Disabled;
            }
            changed
        };
        if changed {
            self.updates.send_replace(());
        }
    }

    pub fn status(&self) -> QueryStatus {
        self.state.lock().status.clone()
    }

    /// Parameters of the latest run.
    pub fn params(&self) -> Option<QueryParams> {
        self.state.lock().params.clone()
    }

    pub fn page(&self) -> Option<TaskPage> {
        match &self.state.lock().status {
            QueryStatus::Ready(page) => Some(page.clone()),
            _ => None,
        }
    }

    /// Pagination of the current page, or the placeholder before one loaded.
    pub fn pagination(&self) -> Pagination {
        self.page().map(|page| page.pagination).unwrap_or_else(Pagination::placeholder)
    }
}

/// Background task re-running the query on every view or session change.
pub struct QueryDriver {
    handle: JoinHandle<()>,
}

impl QueryDriver {
    pub fn spawn(view: Arc<ViewState>, query: Arc<TaskQuery>) -> Self {
        let mut params_rx = view.subscribe();
        let mut session_rx = query.session().subscribe();

        let handle = tokio::spawn(async move {
            loop {
                let params = params_rx.borrow_and_update().clone();
                session_rx.borrow_and_update();

                if !query.session().is_logged_in() {
                    query.disable();
                } else if view.is_hydrated() {
                    if let Some(ticket) = query.begin(params) {
                        let query = Arc::clone(&query);
                        tokio::spawn(async move {
                            query.finish(ticket).await;
                        });
                    }
                }

                tokio::select! {
                    changed = params_rx.changed() => if changed.is_err() { break },
                    changed = session_rx.changed() => if changed.is_err() { break },
                }
            }
        });

        Self { handle }
    }
}

impl Drop for QueryDriver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
