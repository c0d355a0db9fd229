//! Comment store.

use super::{parse_timestamp, row_to_profile, timestamp};
use crate::db::Db;
use chrono::Utc;
use quill_core::{Comment, CommentId, Error, Result, Slug, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

/// Selects a comment joined with its author and the viewer-relative
/// following flag. Viewer binds as ?2; without one the flag is false.
const SELECT_COMMENT: &str = "SELECT c.id, c.body, c.created_at, c.updated_at,
        u.username, u.bio, u.image,
        EXISTS(SELECT 1 FROM user_followers w
                WHERE w.user_id = ?2 AND w.followee_id = c.author_id) AS following
   FROM comments c
   JOIN users u ON u.id = c.author_id";

/// CRUD for comments scoped to an article.
#[derive(Clone)]
pub struct CommentStore {
    db: Db,
}

impl CommentStore {
    /// Create a new comment store.
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Insert a comment and return the composed view.
    pub async fn add(&self, slug: &Slug, author: &UserId, body: &str) -> Result<Comment> {
        let now = timestamp(&Utc::now());
        let result = sqlx::query(
            "INSERT INTO comments (article_slug, author_id, body, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
        )
        .bind(slug.to_string())
        .bind(author.to_string())
        .bind(body)
        .bind(&now)
        .execute(self.db.pool())
        .await?;

        let id = CommentId::from(result.last_insert_rowid());
        debug!(%slug, %id, "comment inserted");

        self.find(id, Some(author))
            .await?
            .ok_or_else(|| Error::Internal(format!("comment {id} missing after insert")))
    }

    /// Look up a single comment.
    pub async fn find(&self, id: CommentId, viewer: Option<&UserId>) -> Result<Option<Comment>> {
        let sql = format!("{SELECT_COMMENT} WHERE c.id = ?1");
        let row = sqlx::query(&sql)
            .bind(id.get())
            .bind(viewer.map(ToString::to_string))
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_comment).transpose()
    }

    /// All comments on an article, most recent first.
    pub async fn list_for_article(
        &self,
        slug: &Slug,
        viewer: Option<&UserId>,
    ) -> Result<Vec<Comment>> {
        let sql = format!(
            "{SELECT_COMMENT} WHERE c.article_slug = ?1
             ORDER BY c.created_at DESC, c.id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(slug.to_string())
            .bind(viewer.map(ToString::to_string))
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(Self::row_to_comment).collect()
    }

    /// Whether the comment was written by the user. `None` when no such
    /// comment exists.
    pub async fn same_author(&self, id: CommentId, user: &UserId) -> Result<Option<bool>> {
        let row = sqlx::query("SELECT author_id FROM comments WHERE id = ?1")
            .bind(id.get())
            .fetch_optional(self.db.pool())
            .await?;

        match row {
            None => Ok(None),
            Some(row) => {
                let author: String = row.try_get("author_id")?;
                Ok(Some(author == user.to_string()))
            }
        }
    }

    /// Delete a comment of the given article. Returns rows affected.
    pub async fn delete(&self, slug: &Slug, id: CommentId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?1 AND article_slug = ?2")
            .bind(id.get())
            .bind(slug.to_string())
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected())
    }

    fn row_to_comment(row: &SqliteRow) -> Result<Comment> {
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;
        Ok(Comment {
            id: CommentId::from(row.try_get::<i64, _>("id")?),
            body: row.try_get("body")?,
            author: row_to_profile(row)?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}
