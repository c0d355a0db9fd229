//! Quill Store - SQLite persistence for the Quill blogging platform.
//!
//! The content/social data layer: articles, tags, comments, favorites, and
//! the follow graph, exposed as typed async operations for upstream request
//! handlers.
//!
//! # Architecture
//!
//! ```text
//! request handler
//!       │
//!  Repositories (articles / comments / profiles / users)
//!       │        typed errors, authorization, transactions
//!    Stores (articles+listings / tags / favorites / follows / comments / users)
//!       │        one store per table family
//!       Db ──── SQLite (sqlx pool)
//! ```
//!
//! Multi-statement writes run inside a single [`Db`] transaction; reads go
//! to the store of record on every call (no in-process caches). Operations
//! are plain futures: impose deadlines with `tokio::time::timeout`, and a
//! transaction dropped before commit rolls back.

#![forbid(unsafe_code)]

pub mod db;
pub mod repository;
pub mod store;

pub use db::Db;
pub use repository::{ArticleRepository, CommentRepository, ProfileRepository, UserRepository};
pub use store::articles::ArticleStore;
pub use store::comments::CommentStore;
pub use store::favorites::FavoriteStore;
pub use store::follows::FollowGraphStore;
pub use store::tags::TagStore;
pub use store::users::UserStore;

use quill_core::Result;
use std::path::Path;

/// The assembled data layer.
///
/// Construction is the single composition point: every store and repository
/// is wired here by constructor injection, once, against one shared [`Db`].
pub struct Quill {
    db: Db,
    /// Article operations.
    pub articles: ArticleRepository,
    /// Comment operations.
    pub comments: CommentRepository,
    /// Profile operations.
    pub profiles: ProfileRepository,
    /// Registration and user lookups.
    pub users: UserRepository,
    /// Tag enumeration (tag-cloud browsing).
    pub tags: TagStore,
}

impl Quill {
    /// Open (or create) the database file and assemble the layer.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let db = Db::from_path(path).await?;
        Self::assemble(db).await
    }

    /// Assemble over an in-memory database (for tests).
    pub async fn in_memory() -> Result<Self> {
        let db = Db::in_memory().await?;
        Self::assemble(db).await
    }

    async fn assemble(db: Db) -> Result<Self> {
        store::migrations::run(&db).await?;

        let tags = TagStore::new(db.clone());
        let follows = FollowGraphStore::new(db.clone());
        let favorites = FavoriteStore::new(db.clone());
        let users = UserStore::new(db.clone());
        let articles = ArticleStore::new(db.clone(), tags.clone());
        let comments = CommentStore::new(db.clone());

        Ok(Self {
            articles: ArticleRepository::new(
                db.clone(),
                articles.clone(),
                tags.clone(),
                favorites,
            ),
            comments: CommentRepository::new(comments, articles),
            profiles: ProfileRepository::new(users.clone(), follows.clone()),
            users: UserRepository::new(db.clone(), users, follows),
            tags,
            db,
        })
    }

    /// The shared database handle.
    #[must_use]
    pub fn db(&self) -> &Db {
        &self.db
    }
}
