//! Task mutations: create, edit, delete and toggle completion.
//!
//! Each mutation is one request followed, on success, by a refetch of the
//! current view. Failures are reported by the API client; nothing here
//! retries. Create and edit refuse to send a title or description that is
//! empty after trimming.

use super::query_engine::{QueryOutcome, TaskQuery};
use super::view_state::ViewState;
use crate::api::tasks::TaskFields;
use crate::api::{ApiError, TasksApi};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

pub struct TaskMutations {
    api: TasksApi,
    query: Arc<TaskQuery>,
    view: Arc<ViewState>,
}

impl TaskMutations {
    pub fn new(api: TasksApi, query: Arc<TaskQuery>, view: Arc<ViewState>) -> Self {
        Self { api, query, view }
    }

    pub async fn create(&self, title: &str, description: &str) -> Result<QueryOutcome> {
        let fields = self.validate(title, description)?;
        self.api.create(&fields).await?;
        info!(title = fields.title, "task created");
        Ok(self.refetch().await)
    }

    pub async fn edit(&self, id: i64, title: &str, description: &str) -> Result<QueryOutcome> {
        let fields = self.validate(title, description)?;
        self.api.update(id, &fields).await?;
        info!(id, "task updated");
        Ok(self.refetch().await)
    }

    /// Deletes the task; steps back one page when that left the current page
    /// empty and it was not the first one.
    ///
    /// The decision is taken from the latest stored page, so it holds when a
    /// concurrent run for the same view superseded this refetch.
    pub async fn delete(&self, id: i64) -> Result<QueryOutcome> {
        self.api.delete(id).await?;
        info!(id, "task deleted");

        let outcome = match self.refetch().await {
            QueryOutcome::Superseded => self.query.settled().await.into(),
            outcome => outcome,
        };

        let params = self.view.params();
        let emptied = self.query.page().is_some_and(|page| page.is_empty())
            && self.query.params().as_ref() == Some(&params);
        if emptied && params.page > 1 {
            info!(from = params.page, "page emptied by delete, stepping back");
            let previous = self.view.set_page(params.page - 1)?;
            return Ok(self.query.run(previous).await);
        }
        Ok(outcome)
    }

    pub async fn toggle(&self, id: i64, completed: bool) -> Result<QueryOutcome> {
        self.api.update_status(id, completed).await?;
        info!(id, completed, "task status updated");
        Ok(self.refetch().await)
    }

    async fn refetch(&self) -> QueryOutcome {
        self.query.run(self.view.params()).await
    }

    fn validate<'a>(&self, title: &'a str, description: &'a str) -> Result<TaskFields<'a>, ApiError> {
        let fields = TaskFields {
            title: title.trim(),
            description: description.trim(),
        };
        let missing = if fields.title.is_empty() {
            Some("title")
        } else if fields.description.is_empty() {
            Some("description")
        } else {
            None
        };

        match missing {
            Some(field) => {
                let err = ApiError::ValidationRejected { field };
                self.api.client().notifier().error(err.notification());
                Err(err)
            }
            None => Ok(fields),
        }
    }
}

