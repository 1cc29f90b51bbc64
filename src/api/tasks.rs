//! Task endpoints.

use super::{ApiClient, ApiError, ApiRequest};
use crate::libs::query::QueryParams;
use crate::libs::task::TaskPage;
use serde::{de::IgnoredAny, Serialize};
use std::sync::Arc;

const LIST_URL: &str = "task/get/all";
const CREATE_URL: &str = "task/create";
const UPDATE_URL: &str = "task/update";
const STATUS_URL: &str = "task/update/status";
const DELETE_URL: &str = "task/delete";

#[derive(Debug, Clone, Serialize)]
pub struct TaskFields<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

#[derive(Serialize)]
struct StatusUpdate {
    completed: bool,
}

#[derive(Clone)]
pub struct TasksApi {
    client: Arc<ApiClient>,
}

impl TasksApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub async fn get_all(&self, params: &QueryParams) -> Result<TaskPage, ApiError> {
        self.client
            .request(ApiRequest::get(LIST_URL).params(params.to_request_pairs()))
            .await
    }

    pub async fn create(&self, fields: &TaskFields<'_>) -> Result<(), ApiError> {
        let _: IgnoredAny = self.client.request(ApiRequest::post(CREATE_URL).json(fields)?).await?;
        Ok(())
    }

    pub async fn update(&self, id: i64, fields: &TaskFields<'_>) -> Result<(), ApiError> {
        let path = format!("{}/{}", UPDATE_URL, id);
        let _: IgnoredAny = self.client.request(ApiRequest::put(path).json(fields)?).await?;
        Ok(())
    }

    pub async fn update_status(&self, id: i64, completed: bool) -> Result<(), ApiError> {
        let path = format!("{}/{}", STATUS_URL, id);
        let _: IgnoredAny = self
            .client
            .request(ApiRequest::put(path).json(&StatusUpdate { completed })?)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("{}/{}", DELETE_URL, id);
        let _: IgnoredAny = self.client.request(ApiRequest::delete(path)).await?;
        Ok(())
    }
}
