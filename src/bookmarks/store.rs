use anyhow::Result;
use libsql::Connection;
use serde::{Deserialize, Serialize};

use super::{BookmarkPatch, NewBookmark};
use crate::sanitize::clean_html;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i32,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub rating: i32,
}

impl Bookmark {
    /// Copy safe for rendering. Free-text fields go through the HTML filter;
    /// id, url, and rating pass through unchanged.
    pub fn sanitized(self) -> Self {
        Bookmark {
            id: self.id,
            title: clean_html(&self.title),
            url: self.url,
            description: self.description.as_deref().map(clean_html),
            rating: self.rating,
        }
    }
}

pub struct BookmarkStore<'a> {
    conn: &'a Connection,
}

impl<'a> BookmarkStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<Bookmark>> {
        let query = r#"
            SELECT id, title, url, description, rating
            FROM bookmarks
            ORDER BY id ASC
        "#;

        let mut rows = self.conn.query(query, ()).await?;
        let mut bookmarks = Vec::new();

        while let Some(row) = rows.next().await? {
            bookmarks.push(self.row_to_bookmark(&row)?);
        }

        Ok(bookmarks)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Bookmark>> {
        let query = r#"
            SELECT id, title, url, description, rating
            FROM bookmarks WHERE id = ?
        "#;

        let mut rows = self.conn.query(query, libsql::params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(self.row_to_bookmark(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn insert(&self, input: NewBookmark) -> Result<Bookmark> {
        let query = r#"
            INSERT INTO bookmarks (title, url, description, rating)
            VALUES (?, ?, ?, ?)
            RETURNING id, title, url, description, rating
        "#;

        let mut rows = self
            .conn
            .query(
                query,
                libsql::params![input.title, input.url, input.description, input.rating],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(self.row_to_bookmark(&row)?)
        } else {
            anyhow::bail!("Failed to insert bookmark")
        }
    }

    /// Applies only the supplied fields. The affected count is 0 when the id
    /// does not exist; a patch with nothing set issues no statement at all.
    pub async fn update(&self, id: i32, patch: BookmarkPatch) -> Result<u64> {
        let mut updates = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(title) = patch.title {
            updates.push("title = ?");
            params.push(title.into());
        }
        if let Some(url) = patch.url {
            updates.push("url = ?");
            params.push(url.into());
        }
        if let Some(description) = patch.description {
            updates.push("description = ?");
            params.push(description.into());
        }
        if let Some(rating) = patch.rating {
            updates.push("rating = ?");
            params.push(rating.into());
        }

        if updates.is_empty() {
            return Ok(0);
        }

        params.push(id.into());
        let query = format!("UPDATE bookmarks SET {} WHERE id = ?", updates.join(", "));

        let affected = self.conn.execute(&query, params).await?;
        Ok(affected)
    }

    pub async fn delete_by_id(&self, id: i32) -> Result<u64> {
        let affected = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?", libsql::params![id])
            .await?;
        Ok(affected)
    }

    fn row_to_bookmark(&self, row: &libsql::Row) -> Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            description: row.get(3)?,
            rating: row.get(4)?,
        })
    }
}
