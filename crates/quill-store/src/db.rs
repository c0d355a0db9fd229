//! Shared database handle and transaction entry point.

use quill_core::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Handle on the SQLite connection pool.
///
/// Every store holds a clone; it is the only shared mutable resource in the
/// layer. Single-statement operations run straight on [`Db::pool`];
/// multi-statement writes go through [`Db::begin`].
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Open (or create) the database file. Enables WAL and foreign-key
    /// enforcement on every pooled connection.
    pub async fn from_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| quill_core::Error::Internal(format!("mkdir: {e}")))?;
        }
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        info!("database opened at {}", db_path.display());
        Ok(Self { pool })
    }

    /// Single-connection in-memory database (for tests).
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        debug!("in-memory database opened");
        Ok(Self { pool })
    }

    /// The underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Begin a unit of work. Commit publishes every statement executed on
    /// the transaction; dropping it without commit (error propagation,
    /// cancellation) rolls everything back.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }
}
