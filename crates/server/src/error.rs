use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::{task::TaskError, user::UserError};
use serde::Serialize;
use thiserror::Error;
use utils_jwt::TokenError;

use crate::validate::{FieldError, ValidationErrors};

/// Plain `{"message": ...}` response body, shared by error responses and the
/// few endpoints that answer with a bare confirmation.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub message: String,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("request validation failed")]
    Validation(Vec<FieldError>),
    #[error("Not authorized, no token")]
    MissingToken,
    #[error("Not authorized, token failed")]
    InvalidToken,
    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        ApiError::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Task(err) => match err {
                TaskError::NotFound => (StatusCode::NOT_FOUND, "TaskError"),
                TaskError::EmptyTitle => (StatusCode::BAD_REQUEST, "TaskError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "TaskError"),
            },
            ApiError::User(err) => match err {
                UserError::EmailTaken => (StatusCode::BAD_REQUEST, "UserError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "UserError"),
            },
            ApiError::Token(err) => match err {
                TokenError::Verify(_) => (StatusCode::UNAUTHORIZED, "TokenError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "TokenError"),
            },
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "ValidationError"),
            ApiError::MissingToken | ApiError::InvalidToken | ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "AuthError")
            }
        };

        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                error_type,
                error = %self,
                "API request failed"
            );
        }

        match self {
            ApiError::Validation(errors) => {
                (status_code, Json(ValidationErrors { errors })).into_response()
            }
            ApiError::Task(TaskError::EmptyTitle) => {
                // Store-level backstop; the route validators normally catch
                // this before the store does.
                let errors = vec![FieldError::new("title", "Title cannot be empty")];
                (status_code, Json(ValidationErrors { errors })).into_response()
            }
            other => {
                let message = if status_code.is_server_error() {
                    // Details went to the log line above; clients get a
                    // fixed string.
                    "Server error".to_string()
                } else if matches!(other, ApiError::Token(_)) {
                    "Not authorized, token failed".to_string()
                } else {
                    other.to_string()
                };
                (status_code, Json(ApiMessage::new(message))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    #[test]
    fn api_error_maps_to_expected_http_statuses() {
        assert_eq!(
            ApiError::MissingToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Validation(vec![]).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn domain_errors_map_to_expected_http_statuses() {
        assert_eq!(
            ApiError::from(TaskError::NotFound).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(TaskError::EmptyTitle)
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(UserError::EmailTaken)
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(TaskError::Database(sqlx::Error::RowNotFound))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(sqlx::Error::RowNotFound)
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn bodies_carry_the_wire_messages() {
        let response = ApiError::from(TaskError::NotFound).into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Task not found"}));

        let response = ApiError::from(TaskError::Database(sqlx::Error::RowNotFound)).into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Server error"}));

        let response =
            ApiError::Validation(vec![FieldError::new("status", "Invalid status")]).into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"errors": [{"field": "status", "message": "Invalid status"}]})
        );
    }
}
