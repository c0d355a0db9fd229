//! Favorite relation store.

use crate::db::Db;
use quill_core::{Result, Slug, UserId};
use sqlx::Row;

/// Maintains the (user, article) favorite relation. At most one row per
/// pair; all writes are idempotent.
#[derive(Clone)]
pub struct FavoriteStore {
    db: Db,
}

impl FavoriteStore {
    /// Create a new favorite store.
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Mark the article as favorited by the user. No-op if already marked.
    pub async fn favorite(&self, slug: &Slug, user: &UserId) -> Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO article_favorites (article_slug, user_id) VALUES (?1, ?2)",
        )
        .bind(slug.to_string())
        .bind(user.to_string())
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Remove the user's favorite mark. Other users' favorites are
    /// untouched. No-op if not marked.
    pub async fn unfavorite(&self, slug: &Slug, user: &UserId) -> Result<()> {
        sqlx::query("DELETE FROM article_favorites WHERE article_slug = ?1 AND user_id = ?2")
            .bind(slug.to_string())
            .bind(user.to_string())
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    /// Whether the user has favorited the article.
    pub async fn is_favorited(&self, slug: &Slug, user: &UserId) -> Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(
                SELECT 1 FROM article_favorites WHERE article_slug = ?1 AND user_id = ?2
             ) AS found",
        )
        .bind(slug.to_string())
        .bind(user.to_string())
        .fetch_one(self.db.pool())
        .await?;

        Ok(row.try_get("found")?)
    }

    /// Number of users who favorited the article.
    pub async fn count(&self, slug: &Slug) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM article_favorites WHERE article_slug = ?1")
            .bind(slug.to_string())
            .fetch_one(self.db.pool())
            .await?;

        Ok(row.try_get("cnt")?)
    }
}
