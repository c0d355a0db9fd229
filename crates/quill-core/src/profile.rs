//! Viewer-relative user projection.

use crate::text::Username;
use serde::{Deserialize, Serialize};

/// Read projection of a user, computed per request relative to an optional
/// viewer identity. Not stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name of the user.
    pub username: Username,
    /// Short self-description, empty when unset.
    pub bio: String,
    /// Avatar URL, if any.
    pub image: Option<String>,
    /// Whether the viewer follows this user. False without a viewer.
    pub following: bool,
}
