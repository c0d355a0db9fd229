//! Registration and user lookups.

use crate::db::Db;
use crate::store::follows::FollowGraphStore;
use crate::store::users::UserStore;
use quill_core::{Error, NewUser, Result, User, UserId, Username};
use tracing::{info, instrument};

/// Public façade over user rows. Passwords arrive pre-hashed; tokens and
/// credentials are upstream concerns.
#[derive(Clone)]
pub struct UserRepository {
    db: Db,
    users: UserStore,
    follows: FollowGraphStore,
}

impl UserRepository {
    /// Wire the repository from its collaborators.
    #[must_use]
    pub fn new(db: Db, users: UserStore, follows: FollowGraphStore) -> Self {
        Self { db, users, follows }
    }

    /// Register a user. The user row and the self-follow edge (which puts
    /// the user's own articles in their feed) commit in one transaction.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn register(&self, user: &NewUser) -> Result<User> {
        if self.users.exists(&user.username, &user.email).await? {
            return Err(Error::AlreadyExists);
        }

        let mut tx = self.db.begin().await?;
        let id = self.users.insert(&mut tx, user).await?;
        self.follows.follow_in(&mut tx, &id, &id).await?;
        tx.commit().await?;

        info!(user = %id, "user registered");
        self.by_id(&id).await
    }

    /// Look up a user by id.
    pub async fn by_id(&self, id: &UserId) -> Result<User> {
        self.users
            .by_id(id)
            .await?
            .ok_or_else(|| Error::UserNotFound(id.to_string()))
    }

    /// Look up a user by username.
    pub async fn by_username(&self, username: &Username) -> Result<User> {
        self.users
            .by_username(username)
            .await?
            .ok_or_else(|| Error::UserNotFound(username.to_string()))
    }
}
