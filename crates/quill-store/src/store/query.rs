//! Listing and feed composition for [`ArticleStore`].

use super::articles::{row_to_article, ArticleStore, SELECT_ARTICLE};
use futures::future::try_join_all;
use quill_core::{Article, ArticleFilter, Error, Limit, Offset, Result, UserId};
use sqlx::sqlite::SqliteRow;

impl ArticleStore {
    /// Articles matching the filter, newest first (slug breaks ties),
    /// paginated after filtering and ordering.
    ///
    /// Each active predicate becomes a join ANDed into the primary query, so
    /// an unknown tag or username simply matches zero rows. Favorite count
    /// and flags come back with the primary rows; tag lists are attached by
    /// concurrent per-row lookups, all awaited before returning.
    pub async fn list(
        &self,
        filter: &ArticleFilter,
        viewer: Option<&UserId>,
        limit: Limit,
        offset: Offset,
    ) -> Result<Vec<Article>> {
        let mut sql = String::from(SELECT_ARTICLE);
        if filter.tag.is_some() {
            sql.push_str(
                " JOIN article_tags at ON at.article_slug = a.slug
                  JOIN tags t ON t.id = at.tag_id",
            );
        }
        if filter.favorited_by.is_some() {
            sql.push_str(
                " JOIN article_favorites fb ON fb.article_slug = a.slug
                  JOIN users fu ON fu.id = fb.user_id",
            );
        }
        // The viewer binds as ?1 (twice in SELECT_ARTICLE). sqlx mis-binds
        // when numbered (?1) and anonymous (?) placeholders are mixed in one
        // statement, so every following placeholder is numbered explicitly,
        // in bind order.
        let mut next = 1;
        sql.push_str(" WHERE 1 = 1");
        if filter.tag.is_some() {
            next += 1;
            sql.push_str(&format!(" AND t.name = ?{next}"));
        }
        if filter.author.is_some() {
            next += 1;
            sql.push_str(&format!(" AND u.username = ?{next}"));
        }
        if filter.favorited_by.is_some() {
            next += 1;
            sql.push_str(&format!(" AND fu.username = ?{next}"));
        }
        let limit_param = next + 1;
        let offset_param = next + 2;
        sql.push_str(&format!(
            " ORDER BY a.created_at DESC, a.slug ASC LIMIT ?{limit_param} OFFSET ?{offset_param}"
        ));

        let mut query = sqlx::query(&sql).bind(viewer.map(ToString::to_string));
        if let Some(tag) = &filter.tag {
            query = query.bind(tag.as_str());
        }
        if let Some(author) = &filter.author {
            query = query.bind(author.as_str());
        }
        if let Some(favorited_by) = &filter.favorited_by {
            query = query.bind(favorited_by.as_str());
        }
        let rows = query
            .bind(i64::from(limit.get()))
            .bind(i64::from(offset.get()))
            .fetch_all(self.db.pool())
            .await?;

        self.attach_tags(&rows).await
    }

    /// Articles authored by users the viewer follows (the registration
    /// self-edge includes the viewer's own), newest first, paginated.
    pub async fn feed(
        &self,
        viewer: &UserId,
        limit: Limit,
        offset: Offset,
    ) -> Result<Vec<Article>> {
        let sql = format!(
            "{SELECT_ARTICLE}
             JOIN user_followers fw ON fw.followee_id = a.author_id AND fw.user_id = ?1
             ORDER BY a.created_at DESC, a.slug ASC LIMIT ?2 OFFSET ?3"
        );
        let rows = sqlx::query(&sql)
            .bind(viewer.to_string())
            .bind(i64::from(limit.get()))
            .bind(i64::from(offset.get()))
            .fetch_all(self.db.pool())
            .await?;

        self.attach_tags(&rows).await
    }

    /// Fan out one tag lookup per primary row and await them all; row order
    /// is preserved.
    async fn attach_tags(&self, rows: &[SqliteRow]) -> Result<Vec<Article>> {
        let articles = rows.iter().map(row_to_article).collect::<Result<Vec<_>>>()?;
        try_join_all(articles.into_iter().map(|mut article| async move {
            article.tag_list = self.tags.for_article(&article.slug).await?;
            Ok::<Article, Error>(article)
        }))
        .await
    }
}
