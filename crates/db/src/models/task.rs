use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use uuid::Uuid;

use crate::retry::retry_on_sqlite_busy;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Task not found")]
    NotFound,
    #[error("Title cannot be empty")]
    EmptyTitle,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    sqlx::Type,
    EnumString,
    Display,
)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    sqlx::Type,
    EnumString,
    Display,
)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    #[sqlx(rename = "user_id")]
    pub owner: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub search: Option<String>,
}

const TASK_COLUMNS: &str =
    "id, user_id, title, description, status, priority, created_at, updated_at";

impl Task {
    /// List one owner's tasks, newest first. `status` must already be a
    /// valid value (callers drop unparseable filters); `search` is a
    /// case-insensitive substring match on the title, with the empty string
    /// meaning "no filter".
    pub async fn find_for_owner(
        pool: &SqlitePool,
        owner: Uuid,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = "));
        query.push_bind(owner);
        if let Some(status) = filter.status {
            query.push(" AND status = ");
            query.push_bind(status);
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query.push(" AND instr(lower(title), lower(");
            query.push_bind(search);
            query.push(")) > 0");
        }
        // rowid breaks created_at ties so same-instant inserts stay
        // newest-first.
        query.push(" ORDER BY created_at DESC, rowid DESC");

        query.build_query_as::<Task>().fetch_all(pool).await
    }

    pub async fn find_by_id_for_owner(
        pool: &SqlitePool,
        owner: Uuid,
        id: Uuid,
    ) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        owner: Uuid,
        data: &CreateTask,
    ) -> Result<Task, TaskError> {
        let title = data.title.trim();
        if title.is_empty() {
            return Err(TaskError::EmptyTitle);
        }

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            owner,
            title: title.to_string(),
            description: data.description.clone().unwrap_or_default(),
            status: data.status.unwrap_or_default(),
            priority: data.priority.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        retry_on_sqlite_busy(|| async {
            sqlx::query(
                "INSERT INTO tasks (id, user_id, title, description, status, priority, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(task.id)
            .bind(task.owner)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .bind(task.priority)
            .bind(task.created_at)
            .bind(task.updated_at)
            .execute(pool)
            .await
            .map(|_| ())
        })
        .await?;

        Ok(task)
    }

    /// Apply a partial update. Absent fields keep their values; a provided
    /// title must be non-empty after trimming. `updated_at` is bumped on
    /// every successful call, equal values included.
    pub async fn update(
        pool: &SqlitePool,
        owner: Uuid,
        id: Uuid,
        data: &UpdateTask,
    ) -> Result<Task, TaskError> {
        let Some(mut task) = Self::find_by_id_for_owner(pool, owner, id).await? else {
            return Err(TaskError::NotFound);
        };

        if let Some(title) = &data.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(TaskError::EmptyTitle);
            }
            task.title = title.to_string();
        }
        if let Some(description) = &data.description {
            task.description = description.clone();
        }
        if let Some(status) = data.status {
            task.status = status;
        }
        if let Some(priority) = data.priority {
            task.priority = priority;
        }
        task.updated_at = Utc::now();

        let result = retry_on_sqlite_busy(|| async {
            sqlx::query(
                "UPDATE tasks SET title = $1, description = $2, status = $3, priority = $4, updated_at = $5 \
                 WHERE id = $6 AND user_id = $7",
            )
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .bind(task.priority)
            .bind(task.updated_at)
            .bind(task.id)
            .bind(task.owner)
            .execute(pool)
            .await
        })
        .await?;

        // The task can disappear between the read and the write.
        if result.rows_affected() == 0 {
            return Err(TaskError::NotFound);
        }

        Ok(task)
    }

    pub async fn delete(pool: &SqlitePool, owner: Uuid, id: Uuid) -> Result<(), TaskError> {
        let result = retry_on_sqlite_busy(|| async {
            sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(owner)
                .execute(pool)
                .await
        })
        .await?;

        if result.rows_affected() == 0 {
            return Err(TaskError::NotFound);
        }

        Ok(())
    }
}
