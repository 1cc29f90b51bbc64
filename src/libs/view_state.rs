//! View state controller for the task list.
//!
//! Owns the [`QueryParams`] of the task view with the addressable
//! [`Location`] as the single source of truth:
//!
//! - **Hydration**: nothing is published until [`ViewState::hydrate`] has
//!   read the real parameters from the location, so no fetch ever runs
//!   against placeholder defaults
//! - **Mirroring**: every change is written to the location synchronously,
//!   in the same call, with defaults omitted
//! - **Search debounce**: keystrokes only update a draft; the draft is
//!   committed to the parameters after the input has been quiet for the
//!   debounce interval
//!
//! Subscribers receive each committed parameter tuple through a `watch`
//! channel.
//!
//! Setters never touch the page number on their own. Callers that want
//! "new filter starts at page 1" express it with [`ViewState::edit`], which
//! applies several changes as one transition. A committed search always
//! returns to page 1.

use super::location::Location;
use super::query::{OrderBy, QueryParams, SortBy};
use anyhow::Result;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Quiet interval after the last keystroke before a search is committed.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct ViewState {
    location: Arc<dyn Location>,
    limit: u32,
    debounce: Duration,
    hydrated: AtomicBool,
    draft: Mutex<String>,
    pending: Mutex<Option<JoinHandle<()>>>,
    params: watch::Sender<QueryParams>,
}

impl ViewState {
    pub fn new(location: Arc<dyn Location>, limit: u32, debounce: Duration) -> Arc<Self> {
        let (params, _) = watch::channel(QueryParams::with_limit(limit));
        Arc::new(Self {
            location,
            limit: limit.max(1),
            debounce,
            hydrated: AtomicBool::new(false),
            draft: Mutex::new(String::new()),
            pending: Mutex::new(None),
            params,
        })
    }

    /// Reads the parameters from the location and starts publishing.
    pub fn hydrate(&self) -> QueryParams {
        let params = QueryParams::from_location(&self.location.query(), self.limit);
        *self.draft.lock() = params.search.clone();
        self.hydrated.store(true, Ordering::SeqCst);
        debug!(location = %params.display_location(), "view hydrated");
        self.params.send_replace(params.clone());
        params
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated.load(Ordering::SeqCst)
    }

    /// Current parameters; placeholder defaults until hydrated.
    pub fn params(&self) -> QueryParams {
        if self.is_hydrated() {
            QueryParams::from_location(&self.location.query(), self.limit)
        } else {
            self.params.borrow().clone()
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryParams> {
        self.params.subscribe()
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Applies `change` as a single transition: one location write, one
    /// publication. Hydrates first when needed.
    pub fn edit<F>(&self, change: F) -> Result<QueryParams>
    where
        F: FnOnce(&mut QueryParams),
    {
        if !self.is_hydrated() {
            self.hydrate();
        }

        let current = self.params();
        let mut next = current.clone();
        change(&mut next);
        next.page = next.page.max(1);
        next.limit = self.limit;

        if next == current {
            return Ok(current);
        }

        self.location.replace(&next.to_location())?;
        debug!(location = %next.display_location(), "view parameters changed");
        self.params.send_replace(next.clone());
        Ok(next)
    }

    /// Replaces the whole view with the parameters encoded in `location`.
    pub fn navigate(&self, location: &str) -> Result<QueryParams> {
        let target = QueryParams::from_location(location, self.limit);
        self.cancel_pending();
        let params = self.edit(|params| *params = target)?;
        *self.draft.lock() = params.search.clone();
        Ok(params)
    }

    pub fn set_page(&self, page: u32) -> Result<QueryParams> {
        self.edit(|params| params.page = page)
    }

    pub fn next_page(&self) -> Result<QueryParams> {
        self.edit(|params| params.page = params.page.saturating_add(1))
    }

    pub fn previous_page(&self) -> Result<QueryParams> {
        self.edit(|params| params.page = params.page.saturating_sub(1))
    }

    pub fn set_completed(&self, completed: Option<bool>) -> Result<QueryParams> {
        self.edit(|params| params.completed = completed)
    }

    pub fn set_order_by(&self, order_by: OrderBy) -> Result<QueryParams> {
        self.edit(|params| params.order_by = order_by)
    }

    pub fn set_sort_by(&self, sort_by: SortBy) -> Result<QueryParams> {
        self.edit(|params| params.sort_by = sort_by)
    }

    /// Text currently in the search input, committed or not.
    pub fn search_draft(&self) -> String {
        self.draft.lock().clone()
    }

    /// Records a keystroke; the search is committed once input pauses.
    pub fn type_search(self: &Arc<Self>, text: &str) {
        *self.draft.lock() = text.to_string();

        let view = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(view.debounce).await;
            if let Err(e) = view.commit_search() {
                warn!(error = %e, "failed to commit search");
            }
        });

        if let Some(previous) = self.pending.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Commits the draft immediately, skipping the quiet interval.
    pub fn flush_search(&self) -> Result<QueryParams> {
        self.cancel_pending();
        self.commit_search()
    }

    /// Waits until no debounced search is outstanding.
    pub async fn settled(&self) {
        loop {
            let handle = self.pending.lock().take();
            match handle {
                Some(handle) => {
                    let _ = handle.await;
                }
                None => break,
            }
        }
    }

    fn commit_search(&self) -> Result<QueryParams> {
        let search = self.draft.lock().trim().to_string();
        self.edit(|params| {
            if params.search != search {
                params.search = search;
                params.page = 1;
            }
        })
    }

    fn cancel_pending(&self) {
        if let Some(pending) = self.pending.lock().take() {
            pending.abort();
        }
    }
}
