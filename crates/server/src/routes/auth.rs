use axum::{
    Extension, Router,
    extract::{Json, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::user::{NewUser, User};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    error::ApiError,
    password::{hash_password, verify_password},
    validate::{FieldError, is_valid_email},
};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Issued token plus the user it belongs to. `password_hash` never
/// serializes, so this is safe to hand straight back to clients.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, ResponseJson<AuthResponse>), ApiError> {
    let mut errors = Vec::new();

    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    let email = payload.email.as_deref().map(str::trim).unwrap_or_default();
    if !is_valid_email(email) {
        errors.push(FieldError::new("email", "Please include a valid email"));
    }
    let password = payload.password.as_deref().unwrap_or_default();
    if password.chars().count() < 6 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let user = User::create(
        &state.db.pool,
        &NewUser {
            name: name.to_string(),
            email: email.to_lowercase(),
            password_hash: hash_password(password),
        },
    )
    .await?;
    tracing::info!("Registered user {}", user.id);

    let token = utils_jwt::issue_token(&state.config.jwt_secret, user.id, state.config.token_ttl)?;
    Ok((StatusCode::CREATED, ResponseJson(AuthResponse { token, user })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<AuthResponse>, ApiError> {
    let mut errors = Vec::new();

    let email = payload.email.as_deref().map(str::trim).unwrap_or_default();
    if !is_valid_email(email) {
        errors.push(FieldError::new("email", "Please include a valid email"));
    }
    let password = payload.password.as_deref().unwrap_or_default();
    if password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    // Unknown emails and wrong passwords get the same answer.
    let user = User::find_by_email(&state.db.pool, email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;
    if !verify_password(password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = utils_jwt::issue_token(&state.config.jwt_secret, user.id, state.config.token_ttl)?;
    Ok(ResponseJson(AuthResponse { token, user }))
}

pub async fn me(Extension(user): Extension<User>) -> ResponseJson<User> {
    ResponseJson(user)
}

/// Routes reachable without a token.
pub fn public_router() -> Router<AppState> {
    Router::new().nest(
        "/auth",
        Router::new()
            .route("/register", post(register))
            .route("/login", post(login)),
    )
}

/// Routes that sit behind the auth middleware.
pub fn protected_router() -> Router<AppState> {
    Router::new().nest("/auth", Router::new().route("/me", get(me)))
}
