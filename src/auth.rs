use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::handler::AppState;

/// Bearer-token gate in front of the bookmark routes. The healthcheck is
/// mounted outside this layer and stays open.
pub async fn require_bearer_token(
    State(state): State<AppState>,
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token == state.api_token.as_ref());

    if authorized {
        return next.run(request).await;
    }

    tracing::error!("Unauthorized request to path: {}", request.uri().path());
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": "Unauthorized request" })),
    )
        .into_response()
}
