//! Task store backed by the server's REST API.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;

use super::{StoreError, TaskDraft, TaskFilter, TaskItem, TaskPatch, TaskStore};
use crate::client::ApiClient;

pub struct RemoteTaskStore {
    api: ApiClient,
}

impl RemoteTaskStore {
    /// The client must already carry the session's bearer token; the server
    /// scopes every call to the user behind it.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct Confirmation {
    message: String,
}

#[async_trait]
impl TaskStore for RemoteTaskStore {
    async fn list(&self, filter: &TaskFilter) -> Result<Vec<TaskItem>, StoreError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(status) = filter.status {
            query.push(("status", status.to_string()));
        }
        if let Some(search) = filter.search.as_deref() {
            if !search.is_empty() {
                query.push(("search", search.to_string()));
            }
        }
        self.api
            .send(self.api.request(Method::GET, "/api/tasks").query(&query))
            .await
    }

    async fn get(&self, id: &str) -> Result<TaskItem, StoreError> {
        self.api
            .send(self.api.request(Method::GET, &format!("/api/tasks/{id}")))
            .await
    }

    async fn create(&self, draft: TaskDraft) -> Result<TaskItem, StoreError> {
        self.api
            .send(self.api.request(Method::POST, "/api/tasks").json(&draft))
            .await
    }

    async fn update(&self, id: &str, patch: TaskPatch) -> Result<TaskItem, StoreError> {
        self.api
            .send(
                self.api
                    .request(Method::PUT, &format!("/api/tasks/{id}"))
                    .json(&patch),
            )
            .await
    }

    async fn delete(&self, id: &str) -> Result<String, StoreError> {
        let confirmation: Confirmation = self
            .api
            .send(self.api.request(Method::DELETE, &format!("/api/tasks/{id}")))
            .await?;
        Ok(confirmation.message)
    }
}
