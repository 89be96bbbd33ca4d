use axum::{
    Extension,
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use db::models::{
    task::{Task, TaskError},
    user::User,
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Resolve `{task_id}` to a task owned by the requesting user and stash it
/// in request extensions. Unknown ids, other users' ids, and strings that
/// are not ids at all answer with the same 404, so task ids cannot be
/// probed across accounts.
pub async fn load_task_middleware(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(task_id): Path<String>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Ok(task_id) = Uuid::parse_str(task_id.trim()) else {
        tracing::warn!("Task id {task_id:?} is not a valid id");
        return Err(TaskError::NotFound.into());
    };

    let task = Task::find_by_id_for_owner(&state.db.pool, user.id, task_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Task {task_id} not found for user {}", user.id);
            ApiError::Task(TaskError::NotFound)
        })?;

    let mut request = request;
    request.extensions_mut().insert(task);
    Ok(next.run(request).await)
}
