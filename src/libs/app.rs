//! Wiring of the client layer.
//!
//! [`App`] builds the session store, API client, query engine, view state
//! and mutations once and shares them. Commands open it from the saved
//! configuration; tests assemble it from in-memory parts.

use super::config::Config;
use super::data_storage::DataStorage;
use super::guard::{self, Navigation};
use super::location::{FileLocation, Location};
use super::mutations::TaskMutations;
use super::notify::{ConsoleNotifier, Notifier};
use super::query_engine::TaskQuery;
use super::session::SessionStore;
use super::view_state::ViewState;
use crate::api::auth::RefreshClient;
use crate::api::{ApiClient, AuthApi, TasksApi};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

pub struct App {
    pub client: Arc<ApiClient>,
    pub session: Arc<SessionStore>,
    pub auth: AuthApi,
    pub query: Arc<TaskQuery>,
    pub view: Arc<ViewState>,
    pub mutations: TaskMutations,
}

impl App {
    /// Opens the persisted session and location from the data directory.
    pub fn open(config: &Config) -> Result<Self> {
        let api_url = config.api_url()?;
        let storage = DataStorage::new();
        let session = SessionStore::open(&storage, RefreshClient::new(&api_url))?;
        let location = FileLocation::open(&storage)?;

        Ok(Self::assemble(
            &api_url,
            session,
            Arc::new(location),
            Arc::new(ConsoleNotifier),
            config.page_limit(),
            config.search_debounce(),
        ))
    }

    pub fn assemble(
        api_url: &str,
        session: SessionStore,
        location: Arc<dyn Location>,
        notifier: Arc<dyn Notifier>,
        limit: u32,
        debounce: Duration,
    ) -> Self {
        let session = Arc::new(session);
        let client = Arc::new(ApiClient::new(api_url, Arc::clone(&session), notifier));
        let tasks = TasksApi::new(Arc::clone(&client));
        let query = Arc::new(TaskQuery::new(tasks.clone()));
        let view = ViewState::new(location, limit, debounce);
        let mutations = TaskMutations::new(tasks, Arc::clone(&query), Arc::clone(&view));

        Self {
            auth: AuthApi::new(Arc::clone(&client)),
            client,
            session,
            query,
            view,
            mutations,
        }
    }

    /// Route guard decision for `route` under the current session.
    pub fn navigate(&self, route: &str) -> Navigation {
        guard::check(route, self.session.is_logged_in())
    }
}
