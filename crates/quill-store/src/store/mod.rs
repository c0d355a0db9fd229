//! SQLite stores, one per table family.

use chrono::{DateTime, SecondsFormat, Utc};
use quill_core::{Error, Profile, Result, Username};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

pub mod articles;
pub mod comments;
pub mod favorites;
pub mod follows;
pub mod tags;
pub mod users;

mod query;

pub(crate) mod migrations;

#[cfg(test)]
mod tests;

/// Fixed-precision RFC 3339 rendering. Uniform width keeps lexicographic
/// `ORDER BY` on timestamp columns chronological.
pub(crate) fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("invalid timestamp `{raw}`: {e}")))
}

/// Map an author-joined row (username, bio, image, following) to a profile.
pub(crate) fn row_to_profile(row: &SqliteRow) -> Result<Profile> {
    let username: String = row.try_get("username")?;
    Ok(Profile {
        username: Username::new(username)?,
        bio: row.try_get("bio")?,
        image: row.try_get("image")?,
        following: row.try_get("following")?,
    })
}
