//! HTTP client for the taskdeck server API.
//!
//! `TASKDECK_SERVER_URL` names the server explicitly; without it the client
//! looks for the port file a locally running taskdeckd writes, and finally
//! falls back to the default bind address.

use std::env;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::session::UserProfile;
use crate::store::StoreError;

pub const SERVER_URL_ENV: &str = "TASKDECK_SERVER_URL";
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

pub fn resolve_base_url() -> String {
    if let Ok(url) = env::var(SERVER_URL_ENV) {
        let url = url.trim().trim_end_matches('/');
        if !url.is_empty() {
            return url.to_string();
        }
    }
    match utils_assets::read_port_file() {
        Some(port) => format!("http://127.0.0.1:{port}"),
        None => DEFAULT_BASE_URL.to_string(),
    }
}

/// What the server hands out on register and login.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn from_env() -> Self {
        Self::new(resolve_base_url())
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, StoreError> {
        let body = serde_json::json!({ "name": name, "email": email, "password": password });
        self.send(self.request(Method::POST, "/api/auth/register").json(&body))
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, StoreError> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.send(self.request(Method::POST, "/api/auth/login").json(&body))
            .await
    }

    /// Fetch the profile behind the current token. Doubles as session
    /// verification: a 401 here means the token is no longer good.
    pub async fn me(&self) -> Result<UserProfile, StoreError> {
        self.send(self.request(Method::GET, "/api/auth/me")).await
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, format!("{}{path}", self.base_url));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, StoreError> {
        let response = builder.send().await.map_err(|err| self.classify(err))?;
        decode(response).await
    }

    fn classify(&self, err: reqwest::Error) -> StoreError {
        if err.is_connect() {
            StoreError::Connect {
                url: self.base_url.clone(),
                source: err,
            }
        } else {
            StoreError::Transport(err)
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    Err(error_from_response(status, &body))
}

/// Map an error response to a [`StoreError`], preferring the field-level
/// `errors` array when the server sent one, otherwise its `message`.
fn error_from_response(status: StatusCode, body: &Value) -> StoreError {
    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        let joined = errors
            .iter()
            .filter_map(|entry| entry.get("message").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("; ");
        if !joined.is_empty() {
            return StoreError::Invalid(joined);
        }
    }
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("the server returned an unexpected response")
        .to_string();
    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound,
        StatusCode::UNAUTHORIZED => StoreError::Unauthorized(message),
        StatusCode::BAD_REQUEST => StoreError::Invalid(message),
        _ => StoreError::Server(message),
    }
}
