use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use db::models::user::User;

use crate::{AppState, error::ApiError};

fn parse_authorization_bearer(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    let (prefix, rest) = trimmed.split_once(' ')?;
    if !prefix.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

/// Verify the bearer token and stash the matching [`User`] in request
/// extensions. Tokens whose user no longer exists are rejected the same way
/// as bad signatures.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_authorization_bearer)
        .ok_or(ApiError::MissingToken)?;

    let claims = utils_jwt::verify_token(&state.config.jwt_secret, token).map_err(|err| {
        tracing::warn!(
            path = %request.uri().path(),
            method = %request.method(),
            error = %err,
            "Rejected API token"
        );
        ApiError::InvalidToken
    })?;

    let user = User::find_by_id(&state.db.pool, claims.sub)
        .await?
        .ok_or(ApiError::InvalidToken)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::parse_authorization_bearer;

    #[test]
    fn bearer_parsing_is_scheme_insensitive_and_trims() {
        assert_eq!(parse_authorization_bearer("Bearer abc"), Some("abc"));
        assert_eq!(parse_authorization_bearer("bearer abc"), Some("abc"));
        assert_eq!(parse_authorization_bearer("  Bearer   abc  "), Some("abc"));
        assert_eq!(parse_authorization_bearer("Basic abc"), None);
        assert_eq!(parse_authorization_bearer("Bearer "), None);
        assert_eq!(parse_authorization_bearer("Bearer"), None);
        assert_eq!(parse_authorization_bearer(""), None);
    }
}
