//! Task store for guest sessions: a JSON file on this machine.
//!
//! Every operation reads the whole list, works on it in memory, and writes
//! the whole list back. Guest tasks use the same shape and defaults as
//! server tasks so switching modes never changes what a task looks like;
//! only the id scheme differs (`guest-<unix millis>`).

use std::fs;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{StoreError, TaskDraft, TaskFilter, TaskItem, TaskPatch, TaskStore};

pub struct GuestTaskStore {
    path: PathBuf,
}

impl GuestTaskStore {
    /// Store at the default location in the app data dir.
    pub fn open() -> Self {
        Self::at(utils_assets::guest_tasks_path())
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// A missing file is an empty list; an unreadable one is logged and
    /// also treated as empty (the next write replaces it).
    fn load(&self) -> Result<Vec<TaskItem>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(tasks) => Ok(tasks),
            Err(err) => {
                tracing::warn!(
                    "guest task file {} is unreadable, starting empty: {err}",
                    self.path.display()
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, tasks: &[TaskItem]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a crash never truncates the list.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(tasks)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Ids embed the creation time in millis; if two tasks land in the same
/// millisecond the component is bumped until the id is free.
fn next_guest_id(tasks: &[TaskItem], now: DateTime<Utc>) -> String {
    let mut millis = now.timestamp_millis();
    loop {
        let id = format!("guest-{millis}");
        if !tasks.iter().any(|task| task.id == id) {
            return id;
        }
        millis += 1;
    }
}

#[async_trait]
impl TaskStore for GuestTaskStore {
    async fn list(&self, filter: &TaskFilter) -> Result<Vec<TaskItem>, StoreError> {
        let mut tasks = self.load()?;
        if let Some(status) = filter.status {
            tasks.retain(|task| task.status == status);
        }
        if let Some(search) = filter.search.as_deref() {
            let needle = search.to_lowercase();
            if !needle.is_empty() {
                tasks.retain(|task| task.title.to_lowercase().contains(&needle));
            }
        }
        // Stable sort: the newest task sits at the front of the file, so
        // same-instant creations keep their insertion order.
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn get(&self, id: &str) -> Result<TaskItem, StoreError> {
        self.load()?
            .into_iter()
            .find(|task| task.id == id)
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, draft: TaskDraft) -> Result<TaskItem, StoreError> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(StoreError::Invalid("Title is required".to_string()));
        }

        let mut tasks = self.load()?;
        let now = Utc::now();
        let task = TaskItem {
            id: next_guest_id(&tasks, now),
            title,
            description: draft.description.unwrap_or_default(),
            status: draft.status.unwrap_or_default(),
            priority: draft.priority.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        tasks.insert(0, task.clone());
        self.save(&tasks)?;
        Ok(task)
    }

    async fn update(&self, id: &str, patch: TaskPatch) -> Result<TaskItem, StoreError> {
        if let Some(title) = patch.title.as_deref() {
            if title.trim().is_empty() {
                return Err(StoreError::Invalid("Title cannot be empty".to_string()));
            }
        }

        let mut tasks = self.load()?;
        let task = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(StoreError::NotFound)?;

        if let Some(title) = patch.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        task.updated_at = Utc::now();

        let updated = task.clone();
        self.save(&tasks)?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<String, StoreError> {
        let mut tasks = self.load()?;
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        if tasks.len() == before {
            return Err(StoreError::NotFound);
        }
        self.save(&tasks)?;
        Ok("Task removed".to_string())
    }
}
