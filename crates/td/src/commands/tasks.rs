//! `td list`, `show`, `add`, `edit`, `rm` and `dashboard`.

use anyhow::{Result, bail};

use crate::client::ApiClient;
use crate::output;
use crate::session::{Session, SessionState};
use crate::store::guest::GuestTaskStore;
use crate::store::remote::RemoteTaskStore;
use crate::store::{TaskDraft, TaskFilter, TaskItem, TaskPatch, TaskPriority, TaskStatus, TaskStore};

/// Pick the backend for the current session. Guest sessions get the local
/// file store, logged-in sessions the server API.
fn task_store(session: &Session) -> Result<Box<dyn TaskStore>> {
    match session.state() {
        SessionState::Guest => Ok(Box::new(GuestTaskStore::open())),
        SessionState::Authenticated { token, .. } => Ok(Box::new(RemoteTaskStore::new(
            ApiClient::from_env().with_token(token.clone()),
        ))),
        SessionState::LoggedOut => {
            bail!("You are not logged in. Run `td login`, `td register` or `td guest` first.")
        }
    }
}

fn render_list(tasks: &[TaskItem]) {
    if tasks.is_empty() {
        println!("No tasks found. Create your first task!");
    } else {
        output::task_table(tasks);
    }
}

/// Mutations re-fetch the whole list afterwards so what is shown is always
/// what the store now holds.
async fn render_refetched(store: &dyn TaskStore) -> Result<()> {
    let tasks = store.list(&TaskFilter::default()).await?;
    render_list(&tasks);
    Ok(())
}

pub async fn list(
    session: &Session,
    status: Option<TaskStatus>,
    search: Option<String>,
) -> Result<()> {
    let store = task_store(session)?;
    let tasks = store.list(&TaskFilter { status, search }).await?;
    render_list(&tasks);
    Ok(())
}

pub async fn show(session: &Session, id: &str) -> Result<()> {
    let store = task_store(session)?;
    let task = store.get(id).await?;
    output::task_detail(&task);
    Ok(())
}

pub async fn add(
    session: &Session,
    title: String,
    description: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
) -> Result<()> {
    // Fail fast before any store call; the store still validates for itself.
    if title.trim().is_empty() {
        bail!("Title is required");
    }

    let store = task_store(session)?;
    let task = store
        .create(TaskDraft {
            title,
            description,
            status,
            priority,
        })
        .await?;

    output::success(&format!("Added \"{}\" ({})", task.title, task.id));
    render_refetched(store.as_ref()).await
}

pub async fn edit(
    session: &Session,
    id: &str,
    title: Option<String>,
    description: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
) -> Result<()> {
    if matches!(title.as_deref(), Some(t) if t.trim().is_empty()) {
        bail!("Title cannot be empty");
    }

    let patch = TaskPatch {
        title,
        description,
        status,
        priority,
    };
    if patch.is_empty() {
        bail!("Nothing to change. Pass at least one of --title, --description, --status, --priority.");
    }

    let store = task_store(session)?;
    let task = store.update(id, patch).await?;

    output::success(&format!("Updated \"{}\"", task.title));
    render_refetched(store.as_ref()).await
}

pub async fn rm(session: &Session, id: &str, yes: bool) -> Result<()> {
    if !yes && !output::confirm("Are you sure you want to delete this task?")? {
        output::dim("Kept the task.");
        return Ok(());
    }

    let store = task_store(session)?;
    let confirmation = store.delete(id).await?;

    output::success(&confirmation);
    render_refetched(store.as_ref()).await
}

pub async fn dashboard(session: &mut Session) -> Result<()> {
    match session.state().clone() {
        SessionState::LoggedOut => {
            output::dim("Not logged in. Run `td login`, `td register` or `td guest`.");
            return Ok(());
        }
        SessionState::Guest => {
            output::header("Guest dashboard");
            output::dim("Tasks are stored locally on this machine.");
        }
        SessionState::Authenticated { token, .. } => {
            let api = ApiClient::from_env().with_token(token.clone());
            let user = api.me().await?;
            output::header(&format!("{}'s dashboard", user.name));
            output::kv("email", &user.email);
            session.set(SessionState::Authenticated { token, user })?;
        }
    }

    let store = task_store(session)?;
    render_refetched(store.as_ref()).await
}
