//! Fixtures shared by the integration tests: a mock task API and an app
//! wired to it with in-memory session, location and notifications.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use taskly::api::auth::RefreshClient;
use taskly::libs::app::App;
use taskly::libs::location::MemoryLocation;
use taskly::libs::notify::MemoryNotifier;
use taskly::libs::session::SessionStore;
use test_context::AsyncTestContext;
use wiremock::{MockServer, Request};

pub const ACCESS_TOKEN: &str = "access-1";
pub const REFRESH_TOKEN: &str = "refresh-1";

pub struct ApiContext {
    pub server: MockServer,
    pub notifier: Arc<MemoryNotifier>,
    pub location: Arc<MemoryLocation>,
    pub app: App,
}

impl ApiContext {
    pub async fn start(location: &str, debounce: Duration) -> Self {
        let server = MockServer::start().await;
        let notifier = Arc::new(MemoryNotifier::new());
        let location = Arc::new(MemoryLocation::new(location));
        let session = SessionStore::in_memory(RefreshClient::new(&server.uri()));
        let app = App::assemble(&server.uri(), session, location.clone(), notifier.clone(), 5, debounce);

        Self {
            server,
            notifier,
            location,
            app,
        }
    }

    pub fn login(&self) {
        self.app
            .session
            .login(ACCESS_TOKEN, Some(REFRESH_TOKEN.to_string()))
            .unwrap();
    }

    /// Requests received on `path`, in arrival order.
    pub async fn requests_to(&self, path: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == path)
            .collect()
    }
}

impl AsyncTestContext for ApiContext {
    async fn setup() -> Self {
        Self::start("", Duration::from_millis(300)).await
    }
}

pub fn task_json(id: i64, title: &str, completed: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("{} details", title),
        "completed": completed,
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z"
    })
}

pub fn page_json(tasks: Vec<Value>, current_page: u32, total_pages: u32, total_items: u32) -> Value {
    json!({
        "tasks": tasks,
        "pagination": {
            "current_page": current_page,
            "total_pages": total_pages,
            "total_items": total_items,
            "items_per_page": 5
        }
    })
}

pub fn bearer(request: &Request) -> Option<String> {
    request
        .headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
