//! Comment view.

use crate::id::CommentId;
use crate::profile::Profile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Composed comment view, scoped to exactly one article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Identifier.
    pub id: CommentId,
    /// Comment text.
    pub body: String,
    /// The author, with the viewer-relative following flag.
    pub author: Profile,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}
