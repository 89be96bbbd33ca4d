use axum::{
    Extension, Router,
    extract::{Json, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{delete, get, put},
};
use db::models::{
    task::{CreateTask, Task, TaskFilter, UpdateTask},
    user::User,
};
use serde::Deserialize;

use crate::{
    AppState,
    error::{ApiError, ApiMessage},
    middleware::load_task_middleware,
    validate::{FieldError, parse_optional},
};

#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    pub status: Option<String>,
    pub search: Option<String>,
}

impl TaskQuery {
    fn into_filter(self) -> TaskFilter {
        TaskFilter {
            // Unknown status filters are dropped rather than rejected, so a
            // stale client keeps getting the unfiltered list.
            status: self.status.as_deref().and_then(|raw| raw.parse().ok()),
            search: self.search,
        }
    }
}

/// Create payload as it arrives on the wire. Enums stay strings here so a
/// bad value turns into a field error instead of a deserialization reject.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl CreateTaskRequest {
    fn validated(self) -> Result<CreateTask, ApiError> {
        let mut errors = Vec::new();

        let title = self.title.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() {
            errors.push(FieldError::new("title", "Title is required"));
        }
        let status = parse_optional(
            self.status.as_deref(),
            &mut errors,
            "status",
            "Invalid status",
        );
        let priority = parse_optional(
            self.priority.as_deref(),
            &mut errors,
            "priority",
            "Invalid priority",
        );

        if !errors.is_empty() {
            return Err(errors.into());
        }
        Ok(CreateTask {
            title: title.to_string(),
            description: self.description,
            status,
            priority,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl UpdateTaskRequest {
    fn validated(self) -> Result<UpdateTask, ApiError> {
        let mut errors = Vec::new();

        let title = self.title.map(|raw| raw.trim().to_string());
        if matches!(title.as_deref(), Some("")) {
            errors.push(FieldError::new("title", "Title cannot be empty"));
        }
        let status = parse_optional(
            self.status.as_deref(),
            &mut errors,
            "status",
            "Invalid status",
        );
        let priority = parse_optional(
            self.priority.as_deref(),
            &mut errors,
            "priority",
            "Invalid priority",
        );

        if !errors.is_empty() {
            return Err(errors.into());
        }
        Ok(UpdateTask {
            title,
            description: self.description,
            status,
            priority,
        })
    }
}

pub async fn get_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<TaskQuery>,
) -> Result<ResponseJson<Vec<Task>>, ApiError> {
    let tasks = Task::find_for_owner(&state.db.pool, user.id, &query.into_filter()).await?;
    Ok(ResponseJson(tasks))
}

pub async fn get_task(Extension(task): Extension<Task>) -> ResponseJson<Task> {
    ResponseJson(task)
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, ResponseJson<Task>), ApiError> {
    let data = payload.validated()?;
    let task = Task::create(&state.db.pool, user.id, &data).await?;
    Ok((StatusCode::CREATED, ResponseJson(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(task): Extension<Task>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<ResponseJson<Task>, ApiError> {
    let data = payload.validated()?;
    let task = Task::update(&state.db.pool, task.owner, task.id, &data).await?;
    Ok(ResponseJson(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(task): Extension<Task>,
) -> Result<ResponseJson<ApiMessage>, ApiError> {
    Task::delete(&state.db.pool, task.owner, task.id).await?;
    Ok(ResponseJson(ApiMessage::new("Task removed")))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let task_actions_router = Router::new()
        .route("/", put(update_task))
        .route("/", delete(delete_task));

    let task_id_router = Router::new()
        .route("/", get(get_task))
        .merge(task_actions_router)
        .layer(from_fn_with_state(state.clone(), load_task_middleware));

    let inner = Router::new()
        .route("/", get(get_tasks).post(create_task))
        .nest("/{task_id}", task_id_router);

    Router::new().nest("/tasks", inner)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::test_support::{api_request, body_json, create_task, register_user, spawn_test_app};

    #[tokio::test]
    async fn create_applies_defaults_and_returns_created() {
        let (_guard, _state, app) = spawn_test_app().await;
        let token = register_user(&app, "Alice", "alice@example.com").await;

        let task = create_task(&app, &token, json!({"title": "  Write report  "})).await;
        assert_eq!(task["title"], "Write report");
        assert_eq!(task["description"], "");
        assert_eq!(task["status"], "pending");
        assert_eq!(task["priority"], "medium");
        assert_eq!(task["createdAt"], task["updatedAt"]);
        assert!(task["id"].is_string());
        assert!(task["owner"].is_string());
    }

    #[tokio::test]
    async fn create_without_title_returns_field_errors() {
        let (_guard, _state, app) = spawn_test_app().await;
        let token = register_user(&app, "Alice", "alice@example.com").await;

        for payload in [json!({}), json!({"title": "   "})] {
            let response = app
                .clone()
                .oneshot(api_request(
                    Method::POST,
                    "/api/tasks",
                    Some(&token),
                    Some(payload),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                body_json(response).await,
                json!({"errors": [{"field": "title", "message": "Title is required"}]})
            );
        }
    }

    #[tokio::test]
    async fn create_collects_every_invalid_field() {
        let (_guard, _state, app) = spawn_test_app().await;
        let token = register_user(&app, "Alice", "alice@example.com").await;

        let response = app
            .clone()
            .oneshot(api_request(
                Method::POST,
                "/api/tasks",
                Some(&token),
                Some(json!({"status": "bogus", "priority": "urgent"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"errors": [
                {"field": "title", "message": "Title is required"},
                {"field": "status", "message": "Invalid status"},
                {"field": "priority", "message": "Invalid priority"},
            ]})
        );
    }

    #[tokio::test]
    async fn list_is_newest_first_and_scoped_to_owner() {
        let (_guard, _state, app) = spawn_test_app().await;
        let alice = register_user(&app, "Alice", "alice@example.com").await;
        let bob = register_user(&app, "Bob", "bob@example.com").await;

        for title in ["first", "second", "third"] {
            create_task(&app, &alice, json!({"title": title})).await;
        }
        create_task(&app, &bob, json!({"title": "bob's own"})).await;

        let response = app
            .clone()
            .oneshot(api_request(Method::GET, "/api/tasks", Some(&alice), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let titles: Vec<String> = body_json(response)
            .await
            .as_array()
            .unwrap()
            .iter()
            .map(|task| task["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, ["third", "second", "first"]);

        let response = app
            .clone()
            .oneshot(api_request(Method::GET, "/api/tasks", Some(&bob), None))
            .await
            .unwrap();
        let bob_tasks = body_json(response).await;
        assert_eq!(bob_tasks.as_array().unwrap().len(), 1);
        assert_eq!(bob_tasks[0]["title"], "bob's own");
    }

    #[tokio::test]
    async fn list_filters_by_status_and_ignores_unknown_filters() {
        let (_guard, _state, app) = spawn_test_app().await;
        let token = register_user(&app, "Alice", "alice@example.com").await;

        create_task(&app, &token, json!({"title": "open one"})).await;
        create_task(&app, &token, json!({"title": "open two"})).await;
        create_task(&app, &token, json!({"title": "done", "status": "completed"})).await;

        let response = app
            .clone()
            .oneshot(api_request(
                Method::GET,
                "/api/tasks?status=completed",
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        let completed = body_json(response).await;
        assert_eq!(completed.as_array().unwrap().len(), 1);
        assert_eq!(completed[0]["title"], "done");

        // An unparseable status filter is ignored, not an error.
        let response = app
            .clone()
            .oneshot(api_request(
                Method::GET,
                "/api/tasks?status=bogus",
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn list_search_matches_title_case_insensitively() {
        let (_guard, _state, app) = spawn_test_app().await;
        let token = register_user(&app, "Alice", "alice@example.com").await;

        create_task(&app, &token, json!({"title": "Write report"})).await;
        create_task(&app, &token, json!({"title": "water plants"})).await;

        let response = app
            .clone()
            .oneshot(api_request(
                Method::GET,
                "/api/tasks?search=REP",
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        let matches = body_json(response).await;
        assert_eq!(matches.as_array().unwrap().len(), 1);
        assert_eq!(matches[0]["title"], "Write report");
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_not_found() {
        let (_guard, _state, app) = spawn_test_app().await;
        let token = register_user(&app, "Alice", "alice@example.com").await;

        for uri in [
            format!("/api/tasks/{}", Uuid::new_v4()),
            "/api/tasks/not-a-task-id".to_string(),
        ] {
            let response = app
                .clone()
                .oneshot(api_request(Method::GET, &uri, Some(&token), None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(
                body_json(response).await,
                json!({"message": "Task not found"})
            );
        }
    }

    #[tokio::test]
    async fn cross_user_access_is_not_found() {
        let (_guard, _state, app) = spawn_test_app().await;
        let alice = register_user(&app, "Alice", "alice@example.com").await;
        let bob = register_user(&app, "Bob", "bob@example.com").await;

        let task = create_task(&app, &alice, json!({"title": "mine"})).await;
        let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

        let attempts = [
            api_request(Method::GET, &uri, Some(&bob), None),
            api_request(Method::PUT, &uri, Some(&bob), Some(json!({"title": "stolen"}))),
            api_request(Method::DELETE, &uri, Some(&bob), None),
        ];
        for request in attempts {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(
                body_json(response).await,
                json!({"message": "Task not found"})
            );
        }

        // Alice's task is untouched.
        let response = app
            .clone()
            .oneshot(api_request(Method::GET, &uri, Some(&alice), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["title"], "mine");
    }

    #[tokio::test]
    async fn update_changes_only_provided_fields() {
        let (_guard, _state, app) = spawn_test_app().await;
        let token = register_user(&app, "Alice", "alice@example.com").await;

        let task = create_task(
            &app,
            &token,
            json!({"title": "Write report", "description": "for Friday"}),
        )
        .await;
        let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

        let response = app
            .clone()
            .oneshot(api_request(
                Method::PUT,
                &uri,
                Some(&token),
                Some(json!({"status": "in-progress"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["status"], "in-progress");
        assert_eq!(updated["title"], "Write report");
        assert_eq!(updated["description"], "for Friday");
        assert_eq!(updated["priority"], "medium");
        assert_ne!(updated["updatedAt"], updated["createdAt"]);
    }

    #[tokio::test]
    async fn update_with_blank_title_is_rejected() {
        let (_guard, _state, app) = spawn_test_app().await;
        let token = register_user(&app, "Alice", "alice@example.com").await;

        let task = create_task(&app, &token, json!({"title": "keep me"})).await;
        let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

        let response = app
            .clone()
            .oneshot(api_request(
                Method::PUT,
                &uri,
                Some(&token),
                Some(json!({"title": "   "})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"errors": [{"field": "title", "message": "Title cannot be empty"}]})
        );

        let response = app
            .clone()
            .oneshot(api_request(Method::GET, &uri, Some(&token), None))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["title"], "keep me");
    }

    #[tokio::test]
    async fn update_with_unknown_enum_is_rejected() {
        let (_guard, _state, app) = spawn_test_app().await;
        let token = register_user(&app, "Alice", "alice@example.com").await;

        let task = create_task(&app, &token, json!({"title": "triage"})).await;
        let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

        let response = app
            .clone()
            .oneshot(api_request(
                Method::PUT,
                &uri,
                Some(&token),
                Some(json!({"status": "archived"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"errors": [{"field": "status", "message": "Invalid status"}]})
        );
    }

    #[tokio::test]
    async fn delete_removes_the_task() {
        let (_guard, _state, app) = spawn_test_app().await;
        let token = register_user(&app, "Alice", "alice@example.com").await;

        let task = create_task(&app, &token, json!({"title": "temporary"})).await;
        let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

        let response = app
            .clone()
            .oneshot(api_request(Method::DELETE, &uri, Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"message": "Task removed"})
        );

        for request in [
            api_request(Method::DELETE, &uri, Some(&token), None),
            api_request(Method::GET, &uri, Some(&token), None),
        ] {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }

        let response = app
            .clone()
            .oneshot(api_request(Method::GET, "/api/tasks", Some(&token), None))
            .await
            .unwrap();
        assert!(body_json(response).await.as_array().unwrap().is_empty());
    }
}
