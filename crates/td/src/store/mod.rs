//! Task storage behind one interface with two backends.
//!
//! [`remote::RemoteTaskStore`] talks to a taskdeckd server as the
//! authenticated user; [`guest::GuestTaskStore`] keeps everything in a JSON
//! file on this machine. Command code only ever sees [`TaskStore`], so the
//! two modes stay interchangeable.

pub mod guest;
pub mod remote;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        })
    }
}

/// One task, as both backends return it. The server includes an `owner`
/// field on the wire; it carries no information client-side and is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new task. Serializes straight into the create request body;
/// omitted fields take the server-side defaults.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
}

/// A partial update; only provided fields change.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Exact status match.
    pub status: Option<TaskStatus>,
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
}

/// Failures common to both backends. Server-reported messages ride along
/// verbatim so commands show exactly what the server said.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Task not found")]
    NotFound,
    /// Validation rejections ("Title is required", "Invalid status", ...).
    #[error("{0}")]
    Invalid(String),
    /// The session token was missing or refused.
    #[error("{0}")]
    Unauthorized(String),
    /// The server reported an internal failure.
    #[error("{0}")]
    Server(String),
    #[error("cannot reach the server at {url} (is taskdeckd running?)")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// CRUD over the caller's own tasks. Implementations are already scoped to
/// one owner: the remote store through its bearer token, the guest store
/// through its file.
#[async_trait]
pub trait TaskStore {
    /// Tasks newest-first, optionally filtered.
    async fn list(&self, filter: &TaskFilter) -> Result<Vec<TaskItem>, StoreError>;

    async fn get(&self, id: &str) -> Result<TaskItem, StoreError>;

    async fn create(&self, draft: TaskDraft) -> Result<TaskItem, StoreError>;

    async fn update(&self, id: &str, patch: TaskPatch) -> Result<TaskItem, StoreError>;

    /// Removes the task and returns the confirmation message for display.
    async fn delete(&self, id: &str) -> Result<String, StoreError>;
}
