//! HTTP Handlers for the Bookmarks API

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::{Bookmark, BookmarkStore, CreateBookmark, UpdateBookmark};
use crate::error::ValidationError;
use crate::handler::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Debug, Serialize)]
struct ErrorMessage {
    message: String,
}

impl ErrorBody {
    fn new(message: impl Into<String>) -> Self {
        ErrorBody {
            error: ErrorMessage {
                message: message.into(),
            },
        }
    }
}

fn success<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

fn created(location: String, bookmark: Bookmark) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(bookmark),
    )
        .into_response()
}

fn no_content() -> Response {
    (StatusCode::NO_CONTENT, ()).into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("Bookmark does not exist")),
    )
        .into_response()
}

fn bad_request(err: ValidationError) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorBody::new(err.to_string()))).into_response()
}

fn storage_fault(state: &AppState, context: &str, err: anyhow::Error) -> Response {
    tracing::error!("{}: {:#}", context, err);
    let message = if state.production {
        "server error".to_string()
    } else {
        format!("{:#}", err)
    };
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(message)),
    )
        .into_response()
}

// ============================================================================
// Bookmark Handlers
// ============================================================================

pub async fn list_bookmarks(State(state): State<AppState>) -> Response {
    let store = BookmarkStore::new(state.db.connection());

    match store.list_all().await {
        Ok(bookmarks) => {
            let sanitized: Vec<Bookmark> =
                bookmarks.into_iter().map(Bookmark::sanitized).collect();
            success(sanitized)
        }
        Err(e) => storage_fault(&state, "Failed to list bookmarks", e),
    }
}

pub async fn get_bookmark(State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    let store = BookmarkStore::new(state.db.connection());

    match store.get_by_id(id).await {
        Ok(Some(bookmark)) => success(bookmark.sanitized()),
        Ok(None) => {
            tracing::error!("Bookmark with id {} not found", id);
            not_found()
        }
        Err(e) => storage_fault(&state, "Failed to get bookmark", e),
    }
}

pub async fn create_bookmark(
    State(state): State<AppState>,
    payload: Option<Json<CreateBookmark>>,
) -> Response {
    let payload = payload.map(|Json(payload)| payload).unwrap_or_default();

    let new_bookmark = match payload.validate() {
        Ok(validated) => validated,
        Err(e) => {
            tracing::error!("Rejected create payload: {}", e);
            return bad_request(e);
        }
    };

    let store = BookmarkStore::new(state.db.connection());
    match store.insert(new_bookmark).await {
        Ok(bookmark) => {
            tracing::info!("Bookmark with id {} created", bookmark.id);
            created(format!("/bookmarks/{}", bookmark.id), bookmark.sanitized())
        }
        Err(e) => storage_fault(&state, "Failed to create bookmark", e),
    }
}

pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Option<Json<UpdateBookmark>>,
) -> Response {
    let store = BookmarkStore::new(state.db.connection());

    // Existence is resolved before the body is inspected.
    match store.get_by_id(id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            tracing::error!("Bookmark with id {} not found", id);
            return not_found();
        }
        Err(e) => return storage_fault(&state, "Failed to get bookmark", e),
    }

    let payload = payload.map(|Json(payload)| payload).unwrap_or_default();
    let patch = match payload.validate() {
        Ok(validated) => validated,
        Err(e) => {
            tracing::error!("Rejected update payload: {}", e);
            return bad_request(e);
        }
    };

    match store.update(id, patch).await {
        Ok(_) => {
            tracing::info!("Bookmark with id {} updated", id);
            no_content()
        }
        Err(e) => storage_fault(&state, "Failed to update bookmark", e),
    }
}

pub async fn delete_bookmark(State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    let store = BookmarkStore::new(state.db.connection());

    match store.delete_by_id(id).await {
        Ok(0) => {
            tracing::error!("Bookmark with id {} not found", id);
            not_found()
        }
        Ok(_) => {
            tracing::info!("Bookmark with id {} deleted", id);
            no_content()
        }
        Err(e) => storage_fault(&state, "Failed to delete bookmark", e),
    }
}
