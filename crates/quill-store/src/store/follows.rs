//! Directed follow edge store.

use crate::db::Db;
use quill_core::{Result, UserId};
use sqlx::{Row, SqliteConnection};

const INSERT_EDGE: &str =
    "INSERT OR IGNORE INTO user_followers (user_id, followee_id) VALUES (?1, ?2)";

/// Maintains the "follower → followee" edge set between users.
///
/// Self-edges are allowed on purpose: registration inserts one so a user's
/// own articles show up in their feed.
#[derive(Clone)]
pub struct FollowGraphStore {
    db: Db,
}

impl FollowGraphStore {
    /// Create a new follow graph store.
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Insert a follow edge. No-op if it already exists.
    pub async fn follow(&self, follower: &UserId, followee: &UserId) -> Result<()> {
        sqlx::query(INSERT_EDGE)
            .bind(follower.to_string())
            .bind(followee.to_string())
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    /// Same as [`FollowGraphStore::follow`], inside the caller's transaction.
    pub(crate) async fn follow_in(
        &self,
        conn: &mut SqliteConnection,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<()> {
        sqlx::query(INSERT_EDGE)
            .bind(follower.to_string())
            .bind(followee.to_string())
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Remove a follow edge. No-op if it does not exist.
    pub async fn unfollow(&self, follower: &UserId, followee: &UserId) -> Result<()> {
        sqlx::query("DELETE FROM user_followers WHERE user_id = ?1 AND followee_id = ?2")
            .bind(follower.to_string())
            .bind(followee.to_string())
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    /// Whether `follower` follows `followee`.
    pub async fn is_following(&self, follower: &UserId, followee: &UserId) -> Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(
                SELECT 1 FROM user_followers WHERE user_id = ?1 AND followee_id = ?2
             ) AS found",
        )
        .bind(follower.to_string())
        .bind(followee.to_string())
        .fetch_one(self.db.pool())
        .await?;

        Ok(row.try_get("found")?)
    }
}
