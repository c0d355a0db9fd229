//! User row store.

use crate::db::Db;
use quill_core::{Email, NewUser, Result, User, UserId, Username};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

/// Lookups and inserts on the users table. Registration orchestration
/// (uniqueness, self-follow edge) lives in the user repository.
#[derive(Clone)]
pub struct UserStore {
    db: Db,
}

impl UserStore {
    /// Create a new user store.
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Insert a user row inside the caller's transaction.
    pub async fn insert(&self, conn: &mut SqliteConnection, user: &NewUser) -> Result<UserId> {
        let id = UserId::generate();
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(id.to_string())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .execute(&mut *conn)
        .await?;
        Ok(id)
    }

    /// Look up a user by id.
    pub async fn by_id(&self, id: &UserId) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, username, email, bio, image FROM users WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// Look up a user by username.
    pub async fn by_username(&self, username: &Username) -> Result<Option<User>> {
        let row =
            sqlx::query("SELECT id, username, email, bio, image FROM users WHERE username = ?1")
                .bind(username.as_str())
                .fetch_optional(self.db.pool())
                .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// Whether a user already holds the username or the email.
    pub async fn exists(&self, username: &Username, email: &Email) -> Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1 OR email = ?2) AS found",
        )
        .bind(username.as_str())
        .bind(email.as_str())
        .fetch_one(self.db.pool())
        .await?;

        Ok(row.try_get("found")?)
    }

    fn row_to_user(row: &SqliteRow) -> Result<User> {
        let id: String = row.try_get("id")?;
        let username: String = row.try_get("username")?;
        let email: String = row.try_get("email")?;
        Ok(User {
            id: UserId::parse(&id)?,
            username: Username::new(username)?,
            email: Email::new(email)?,
            bio: row.try_get("bio")?,
            image: row.try_get("image")?,
        })
    }
}
