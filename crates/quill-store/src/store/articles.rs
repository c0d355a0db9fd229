//! Article store: single-row operations and row mapping.
//!
//! Listing and feed composition live in the sibling query module.

use super::{parse_timestamp, row_to_profile, timestamp};
use crate::db::Db;
use crate::store::tags::TagStore;
use chrono::Utc;
use quill_core::{Article, ArticleUpdate, NewArticle, Result, Slug, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use tracing::debug;

/// Selects an article joined with its author, the aggregate favorite count,
/// and the viewer-relative favorited/following flags. The viewer binds as
/// ?1; without one both flags are false.
pub(crate) const SELECT_ARTICLE: &str = "SELECT a.slug, a.title, a.description, a.body,
        a.created_at, a.updated_at,
        u.username, u.bio, u.image,
        (SELECT COUNT(*) FROM article_favorites f
          WHERE f.article_slug = a.slug) AS favorites_count,
        EXISTS(SELECT 1 FROM article_favorites f
                WHERE f.article_slug = a.slug AND f.user_id = ?1) AS favorited,
        EXISTS(SELECT 1 FROM user_followers w
                WHERE w.user_id = ?1 AND w.followee_id = a.author_id) AS following
   FROM articles a
   JOIN users u ON u.id = a.author_id";

/// Create/find/update/delete for articles plus the composed listings.
#[derive(Clone)]
pub struct ArticleStore {
    pub(crate) db: Db,
    pub(crate) tags: TagStore,
}

impl ArticleStore {
    /// Create a new article store.
    #[must_use]
    pub fn new(db: Db, tags: TagStore) -> Self {
        Self { db, tags }
    }

    /// Insert an article row inside the caller's transaction and return the
    /// generated slug. Tag associations are the caller's job.
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
        article: &NewArticle,
        author: &UserId,
    ) -> Result<Slug> {
        let slug = Slug::generate();
        let now = timestamp(&Utc::now());
        sqlx::query(
            "INSERT INTO articles (slug, title, description, body, author_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        )
        .bind(slug.to_string())
        .bind(&article.title)
        .bind(&article.description)
        .bind(&article.body)
        .bind(author.to_string())
        .bind(&now)
        .execute(&mut *conn)
        .await?;

        debug!(%slug, "article row inserted");
        Ok(slug)
    }

    /// Look up the composed article view. `Ok(None)` when the slug does not
    /// exist.
    pub async fn find(&self, slug: &Slug, viewer: Option<&UserId>) -> Result<Option<Article>> {
        let sql = format!("{SELECT_ARTICLE} WHERE a.slug = ?2");
        let row = sqlx::query(&sql)
            .bind(viewer.map(ToString::to_string))
            .bind(slug.to_string())
            .fetch_optional(self.db.pool())
            .await?;

        let Some(row) = row else { return Ok(None) };
        let mut article = row_to_article(&row)?;
        article.tag_list = self.tags.for_article(slug).await?;
        Ok(Some(article))
    }

    /// Apply the present fields of the patch and bump `updated_at`. Returns
    /// rows affected (0 when the slug does not exist).
    pub async fn update(
        &self,
        conn: &mut SqliteConnection,
        slug: &Slug,
        details: &ArticleUpdate,
    ) -> Result<u64> {
        let mut sql = String::from("UPDATE articles SET updated_at = ?");
        if details.title.is_some() {
            sql.push_str(", title = ?");
        }
        if details.description.is_some() {
            sql.push_str(", description = ?");
        }
        if details.body.is_some() {
            sql.push_str(", body = ?");
        }
        sql.push_str(" WHERE slug = ?");

        let mut query = sqlx::query(&sql).bind(timestamp(&Utc::now()));
        if let Some(title) = &details.title {
            query = query.bind(title);
        }
        if let Some(description) = &details.description {
            query = query.bind(description);
        }
        if let Some(body) = &details.body {
            query = query.bind(body);
        }
        let result = query
            .bind(slug.to_string())
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete the article. Join rows, favorites, and comments go with it
    /// through the foreign-key cascades. Returns rows affected.
    pub async fn delete(&self, slug: &Slug) -> Result<u64> {
        let result = sqlx::query("DELETE FROM articles WHERE slug = ?1")
            .bind(slug.to_string())
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected())
    }

    /// Whether the slug exists.
    pub async fn exists(&self, slug: &Slug) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM articles WHERE slug = ?1) AS found")
            .bind(slug.to_string())
            .fetch_one(self.db.pool())
            .await?;
        Ok(row.try_get("found")?)
    }

    /// Whether the article was written by the user. `None` when the slug
    /// does not exist.
    pub async fn is_same_author(&self, slug: &Slug, user: &UserId) -> Result<Option<bool>> {
        let row = sqlx::query("SELECT author_id FROM articles WHERE slug = ?1")
            .bind(slug.to_string())
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
}

/// Map a [`SELECT_ARTICLE`] row. The tag list starts empty; callers attach
/// it afterwards.
pub(crate) fn row_to_article(row: &SqliteRow) -> Result<Article> {
    let slug: String = row.try_get("slug")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;
    Ok(Article {
        slug: Slug::parse(&slug)?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        body: row.try_get("body")?,
        tag_list: Vec::new(),
        favorited: row.try_get("favorited")?,
        favorites_count: row.try_get("favorites_count")?,
        author: row_to_profile(row)?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
