//! Pagination value objects.
//!
//! Negative input is rejected when the value is built, so query code never
//! re-checks ranges.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Maximum number of rows a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Limit(u32);

impl Limit {
    /// The default page size.
    pub const DEFAULT: Limit = Limit(20);

    /// Build a limit; rejects negative input.
    pub fn new(value: i64) -> Result<Self> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| Error::Validation(format!("limit must be >= 0, got {value}")))
    }

    /// The raw value.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Number of rows a listing skips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Offset(u32);

impl Offset {
    /// The default offset.
    pub const DEFAULT: Offset = Offset(0);

    /// Build an offset; rejects negative input.
    pub fn new(value: i64) -> Result<Self> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| Error::Validation(format!("offset must be >= 0, got {value}")))
    }

    /// The raw value.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Offset {
    fn default() -> Self {
        Self::DEFAULT
    }
}
