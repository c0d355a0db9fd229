//! Tag normalization store.

use crate::db::Db;
use quill_core::{Result, Slug, Tag, TagId, TagName};
use sqlx::{Row, SqliteConnection};
use tracing::debug;

/// Normalizes free-text tags to stable identifiers and maintains the
/// article↔tag join rows.
#[derive(Clone)]
pub struct TagStore {
    db: Db,
}

impl TagStore {
    /// Create a new tag store.
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Look up a tag by normalized text, inserting it first if absent.
    ///
    /// Safe under concurrent callers: the insert defers to the uniqueness
    /// constraint on `tags.name`, so two racing creators both succeed and
    /// observe the same id.
    pub async fn get_or_create(&self, name: &TagName) -> Result<TagId> {
        sqlx::query("INSERT INTO tags (name) VALUES (?1) ON CONFLICT(name) DO NOTHING")
            .bind(name.as_str())
            .execute(self.db.pool())
            .await?;

        let row = sqlx::query("SELECT id FROM tags WHERE name = ?1")
            .bind(name.as_str())
            .fetch_one(self.db.pool())
            .await?;

        let id = TagId::from(row.try_get::<i64, _>("id")?);
        debug!(tag = %name, %id, "tag resolved");
        Ok(id)
    }

    /// Tags attached to an article, in creation order.
    pub async fn for_article(&self, slug: &Slug) -> Result<Vec<TagName>> {
        let rows = sqlx::query(
            "SELECT t.name
             FROM tags t
             JOIN article_tags at ON at.tag_id = t.id
             WHERE at.article_slug = ?1
             ORDER BY t.id",
        )
        .bind(slug.to_string())
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(|row| {
                let name: String = row.try_get("name")?;
                TagName::new(name)
            })
            .collect()
    }

    /// Every known tag. Tag cardinality is small; no pagination.
    pub async fn all(&self) -> Result<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name FROM tags ORDER BY id")
            .fetch_all(self.db.pool())
            .await?;

        rows.iter()
            .map(|row| {
                let name: String = row.try_get("name")?;
                Ok(Tag {
                    id: TagId::from(row.try_get::<i64, _>("id")?),
                    name: TagName::new(name)?,
                })
            })
            .collect()
    }

    /// Write the article↔tag join rows inside the caller's transaction. No
    /// duplicate (article, tag) pairs are created.
    pub async fn link(
        &self,
        conn: &mut SqliteConnection,
        slug: &Slug,
        tag_ids: &[TagId],
    ) -> Result<()> {
        for id in tag_ids {
            sqlx::query(
                "INSERT OR IGNORE INTO article_tags (article_slug, tag_id) VALUES (?1, ?2)",
            )
            .bind(slug.to_string())
            .bind(id.get())
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }
}
