//! Article views and write payloads.

use crate::id::Slug;
use crate::profile::Profile;
use crate::text::{TagName, Username};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Composed article view: the stored row enriched with its tag list,
/// favorite count, and the viewer-relative favorited/following flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Stable identifier.
    pub slug: Slug,
    /// Title.
    pub title: String,
    /// Short summary.
    pub description: String,
    /// Full text.
    pub body: String,
    /// Tags attached to this article. Stable order, but callers must not
    /// rely on more than set equality.
    pub tag_list: Vec<TagName>,
    /// Whether the viewer has favorited this article. False without a viewer.
    pub favorited: bool,
    /// Total number of users who favorited this article.
    pub favorites_count: i64,
    /// The author, with the viewer-relative following flag.
    pub author: Profile,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time. Never earlier than `created_at`.
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticle {
    /// Title.
    pub title: String,
    /// Short summary.
    pub description: String,
    /// Full text.
    pub body: String,
    /// Tags to resolve and attach.
    pub tag_list: Vec<TagName>,
}

/// Partial article update. A `None` field is left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleUpdate {
    /// Replacement title, if any.
    pub title: Option<String>,
    /// Replacement description, if any.
    pub description: Option<String>,
    /// Replacement body, if any.
    pub body: Option<String>,
}

/// Listing filter. Active predicates are ANDed together; a predicate naming
/// an unknown tag or username matches zero rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleFilter {
    /// Keep articles carrying this tag.
    pub tag: Option<TagName>,
    /// Keep articles written by this user.
    pub author: Option<Username>,
    /// Keep articles favorited by this user.
    pub favorited_by: Option<Username>,
}
