//! Fixtures for router tests: a fresh app over a temp-dir database, plus
//! request/response helpers shared by the route test modules.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use serde_json::{Value, json};
use test_support::TestEnvGuard;
use tower::ServiceExt;

use crate::{AppState, config::ServerConfig, http};

/// Build a full router backed by a database in a fresh temp data dir. The
/// guard must stay alive for as long as the app is used.
pub(crate) async fn spawn_test_app() -> (TestEnvGuard, AppState, Router) {
    let mut guard = TestEnvGuard::new();
    guard.set_var("TASKDECK_JWT_SECRET", "test-secret");

    let config = ServerConfig::from_env().expect("config from test env");
    let db = db::DBService::new().await.expect("open test database");
    let state = AppState::new(db, config);
    let app = http::router(state.clone());

    (guard, state, app)
}

pub(crate) fn api_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub(crate) async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user and hand back their bearer token.
pub(crate) async fn register_user(app: &Router, name: &str, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(api_request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"name": name, "email": email, "password": "password123"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    body["token"]
        .as_str()
        .expect("register returns a token")
        .to_string()
}

/// Create a task through the API and return its JSON.
pub(crate) async fn create_task(app: &Router, token: &str, body: Value) -> Value {
    let response = app
        .clone()
        .oneshot(api_request(
            Method::POST,
            "/api/tasks",
            Some(token),
            Some(body),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}
