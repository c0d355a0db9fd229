//! Article orchestration.

use crate::db::Db;
use crate::store::articles::ArticleStore;
use crate::store::favorites::FavoriteStore;
use crate::store::tags::TagStore;
use futures::future::try_join_all;
use quill_core::{
    Article, ArticleFilter, ArticleUpdate, Error, Limit, NewArticle, Offset, Result, Slug, UserId,
};
use tracing::{info, instrument};

/// Public façade over articles: creation with tag resolution, authorized
/// update/delete, favoriting, listings, and the personal feed.
#[derive(Clone)]
pub struct ArticleRepository {
    db: Db,
    articles: ArticleStore,
    tags: TagStore,
    favorites: FavoriteStore,
}

impl ArticleRepository {
    /// Wire the repository from its collaborators.
    #[must_use]
    pub fn new(db: Db, articles: ArticleStore, tags: TagStore, favorites: FavoriteStore) -> Self {
        Self {
            db,
            articles,
            tags,
            favorites,
        }
    }

    /// Create an article.
    ///
    /// Tags resolve concurrently through the race-safe get-or-create; the
    /// article row and its tag joins then commit in one transaction, so no
    /// reader ever observes an article without its tags. The composed view
    /// is re-read after commit.
    #[instrument(skip(self, article), fields(author = %author))]
    pub async fn add(&self, article: &NewArticle, author: &UserId) -> Result<Article> {
        let tag_ids = try_join_all(
            article
                .tag_list
                .iter()
                .map(|tag| self.tags.get_or_create(tag)),
        )
        .await?;

        let mut tx = self.db.begin().await?;
        let slug = self.articles.insert(&mut tx, article, author).await?;
        self.tags.link(&mut tx, &slug, &tag_ids).await?;
        tx.commit().await?;

        info!(%slug, "article created");
        self.articles
            .find(&slug, Some(author))
            .await?
            .ok_or_else(|| Error::Internal(format!("article {slug} missing after insert")))
    }

    /// Fetch the composed article view.
    pub async fn get(&self, slug: &Slug, viewer: Option<&UserId>) -> Result<Article> {
        self.articles
            .find(slug, viewer)
            .await?
            .ok_or(Error::ArticleNotFound(*slug))
    }

    /// Apply a partial update on behalf of `user`, then return the fresh
    /// composed view.
    #[instrument(skip(self, details), fields(slug = %slug, user = %user))]
    pub async fn update(
        &self,
        slug: &Slug,
        details: &ArticleUpdate,
        user: &UserId,
    ) -> Result<Article> {
        self.authorize(slug, user).await?;

        let mut tx = self.db.begin().await?;
        let rows = self.articles.update(&mut tx, slug, details).await?;
        if rows == 0 {
            return Err(Error::ArticleNotFound(*slug));
        }
        tx.commit().await?;

        info!(%slug, "article updated");
        self.get(slug, Some(user)).await
    }

    /// Delete the article on behalf of `user`.
    #[instrument(skip(self), fields(slug = %slug, user = %user))]
    pub async fn remove(&self, slug: &Slug, user: &UserId) -> Result<()> {
        self.authorize(slug, user).await?;
        self.articles.delete(slug).await?;
        info!(%slug, "article removed");
        Ok(())
    }

    /// Mark the article favorited by `user` and return the fresh view.
    #[instrument(skip(self), fields(slug = %slug, user = %user))]
    pub async fn favorite(&self, slug: &Slug, user: &UserId) -> Result<Article> {
        if !self.articles.exists(slug).await? {
            return Err(Error::ArticleNotFound(*slug));
        }
        self.favorites.favorite(slug, user).await?;
        info!(%slug, "article favorited");
        self.get(slug, Some(user)).await
    }

    /// Remove the user's favorite mark and return the fresh view.
    #[instrument(skip(self), fields(slug = %slug, user = %user))]
    pub async fn unfavorite(&self, slug: &Slug, user: &UserId) -> Result<Article> {
        if !self.articles.exists(slug).await? {
            return Err(Error::ArticleNotFound(*slug));
        }
        self.favorites.unfavorite(slug, user).await?;
        info!(%slug, "article unfavorited");
        self.get(slug, Some(user)).await
    }

    /// Filtered listing.
    pub async fn list(
        &self,
        filter: &ArticleFilter,
        viewer: Option<&UserId>,
        limit: Limit,
        offset: Offset,
    ) -> Result<Vec<Article>> {
        self.articles.list(filter, viewer, limit, offset).await
    }

    /// Personal feed: articles from followed authors.
    pub async fn feed(&self, viewer: &UserId, limit: Limit, offset: Offset) -> Result<Vec<Article>> {
        self.articles.feed(viewer, limit, offset).await
    }

    async fn authorize(&self, slug: &Slug, user: &UserId) -> Result<()> {
        match self.articles.is_same_author(slug, user).await? {
            None => Err(Error::ArticleNotFound(*slug)),
            Some(false) => Err(Error::Forbidden),
            Some(true) => Ok(()),
        }
    }
}
