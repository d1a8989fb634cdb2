use axum::{
    Router,
    http::{HeaderValue, header},
    middleware,
    routing::get,
};
use tower_http::set_header::SetResponseHeaderLayer;

pub mod auth;
pub mod bookmarks;
pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod sanitize;

use handler::AppState;

/// Builds the service router: bookmark routes behind the bearer-token gate,
/// healthcheck open, security headers on every response, shared state
/// applied. The binary layers CORS and request tracing on top; tests drive
/// this router directly.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(bookmarks::routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token,
        ))
        .route("/", get(handler::healthcheck))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .with_state(state)
}
