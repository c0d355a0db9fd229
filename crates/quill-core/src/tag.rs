//! Stored tag.

use crate::id::TagId;
use crate::text::TagName;
use serde::{Deserialize, Serialize};

/// A normalized tag with its surrogate identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Surrogate identifier.
    pub id: TagId,
    /// Normalized text, unique across the platform.
    pub name: TagName,
}
