//! Stored user.

use crate::id::UserId;
use crate::text::{Email, Username};
use serde::{Deserialize, Serialize};

/// A registered user. The password hash never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier.
    pub id: UserId,
    /// Unique display name.
    pub username: Username,
    /// Unique email address.
    pub email: Email,
    /// Short self-description, empty when unset.
    pub bio: String,
    /// Avatar URL, if any.
    pub image: Option<String>,
}

/// Registration payload. The caller hashes the password; this layer stores
/// the hash verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Unique display name.
    pub username: Username,
    /// Unique email address.
    pub email: Email,
    /// Pre-hashed password.
    pub password_hash: String,
}
