use axum::{Router, middleware::from_fn_with_state, routing::get};
use tower_http::trace::TraceLayer;

use crate::{AppState, routes};

mod auth;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(routes::auth::protected_router())
        .merge(routes::tasks::router(&state))
        .layer(from_fn_with_state(state.clone(), auth::require_auth))
        // Merged after the auth layer so register/login stay reachable
        // without a token.
        .merge(routes::auth::public_router());

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
