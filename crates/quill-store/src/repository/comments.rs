//! Comment orchestration.

use crate::store::articles::ArticleStore;
use crate::store::comments::CommentStore;
use quill_core::{Comment, CommentId, Error, Result, Slug, UserId};
use tracing::{info, instrument};

/// Public façade over comments. Every operation requires the article to
/// exist; deletion requires the caller to own the comment.
#[derive(Clone)]
pub struct CommentRepository {
    comments: CommentStore,
    articles: ArticleStore,
}

impl CommentRepository {
    /// Wire the repository from its collaborators.
    #[must_use]
    pub fn new(comments: CommentStore, articles: ArticleStore) -> Self {
        Self { comments, articles }
    }

    /// All comments on the article, most recent first.
    pub async fn comments(&self, slug: &Slug, viewer: Option<&UserId>) -> Result<Vec<Comment>> {
        if !self.articles.exists(slug).await? {
            return Err(Error::ArticleNotFound(*slug));
        }
        self.comments.list_for_article(slug, viewer).await
    }

    /// Add a comment to the article.
    #[instrument(skip(self, body), fields(slug = %slug, author = %author))]
    pub async fn add(&self, slug: &Slug, body: &str, author: &UserId) -> Result<Comment> {
        if !self.articles.exists(slug).await? {
            return Err(Error::ArticleNotFound(*slug));
        }
        let comment = self.comments.add(slug, author, body).await?;
        info!(%slug, id = %comment.id, "comment created");
        Ok(comment)
    }

    /// Delete a comment on behalf of `user`.
    #[instrument(skip(self), fields(slug = %slug, id = %id, user = %user))]
    pub async fn remove(&self, slug: &Slug, id: CommentId, user: &UserId) -> Result<()> {
        if !self.articles.exists(slug).await? {
            return Err(Error::ArticleNotFound(*slug));
        }
        match self.comments.same_author(id, user).await? {
            None => Err(Error::CommentNotFound(id)),
            Some(false) => Err(Error::Forbidden),
            Some(true) => {
                let rows = self.comments.delete(slug, id).await?;
                if rows == 0 {
                    return Err(Error::CommentNotFound(id));
                }
                info!(%slug, %id, "comment removed");
                Ok(())
            }
        }
    }
}
