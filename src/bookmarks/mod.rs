//! Bookmarks Module
//!
//! The single collection this service manages: validated create, list, get,
//! partial update, and delete over a `bookmarks` table, with free-text
//! fields filtered on the way out.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bokmerke::bookmarks;
//!
//! // Get the migrations to run
//! for (name, sql) in bookmarks::migrations() {
//!     // Run migration...
//! }
//!
//! // Mount the routes
//! let app = Router::new()
//!     .merge(bookmarks::routes())
//!     .with_state(app_state);
//! ```

mod handler;
mod routes;
mod store;
mod validate;

pub use store::{Bookmark, BookmarkStore};
pub use validate::{BookmarkPatch, CreateBookmark, NewBookmark, UpdateBookmark};

pub use routes::routes;

// ============================================================================
// Migrations
// ============================================================================

/// Returns the migrations for the bookmarks module. Run during application
/// startup so the schema exists before the first request.
pub fn migrations() -> &'static [(&'static str, &'static str)] {
    &[(
        "bookmarks_001_schema.sql",
        include_str!("migrations/001_schema.sql"),
    )]
}
