//! Redaction level policy
//!
//! Maps an ordinal redaction level to the set of entity categories redacted at
//! that level. The table is fixed data; every level redacts everything the
//! level below it does, plus at least one more category.
//!
//! | Level | Categories |
//! |-------|------------|
//! | 1 | PERSON |
//! | 2 | PERSON, ORG |
//! | 3 | PERSON, ORG, GPE, LOC |
//! | 4 | PERSON, ORG, GPE, LOC, DATE |
//! | 5 | PERSON, ORG, GPE, LOC, DATE, MONEY, CARDINAL |
//!
//! # Examples
//!
//! ```
//! use docveil::redaction::policy::categories_for;
//! use docveil::redaction::models::EntityCategory;
//!
//! let active = categories_for(2);
//! assert!(active.contains(&EntityCategory::Org));
//! assert!(!active.contains(&EntityCategory::Date));
//!
//! // Out-of-range levels redact nothing
//! assert!(categories_for(9).is_empty());
//! ```

use crate::domain::{DocveilError, Result};
use crate::redaction::models::EntityCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Lowest supported level
pub const MIN_LEVEL: i64 = 1;

/// Highest supported level
pub const MAX_LEVEL: i64 = 5;

const LEVEL_TABLE: [&[EntityCategory]; 5] = [
    &[EntityCategory::Person],
    &[EntityCategory::Person, EntityCategory::Org],
    &[
        EntityCategory::Person,
        EntityCategory::Org,
        EntityCategory::Gpe,
        EntityCategory::Loc,
    ],
    &[
        EntityCategory::Person,
        EntityCategory::Org,
        EntityCategory::Gpe,
        EntityCategory::Loc,
        EntityCategory::Date,
    ],
    &[
        EntityCategory::Person,
        EntityCategory::Org,
        EntityCategory::Gpe,
        EntityCategory::Loc,
        EntityCategory::Date,
        EntityCategory::Money,
        EntityCategory::Cardinal,
    ],
];

/// Categories redacted at `level`
///
/// Levels outside 1-5 return an empty set instead of failing. Use
/// [`RedactionLevel::new`] where an out-of-range level must be an error.
pub fn categories_for(level: i64) -> BTreeSet<EntityCategory> {
    match RedactionLevel::new(level) {
        Ok(level) => level.categories(),
        Err(_) => BTreeSet::new(),
    }
}

/// Validated redaction level in 1-5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RedactionLevel(u8);

impl RedactionLevel {
    /// Create a level, rejecting anything outside 1-5
    pub fn new(level: i64) -> Result<Self> {
        if (MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            Ok(Self(level as u8))
        } else {
            Err(DocveilError::InvalidLevel(level))
        }
    }

    /// Numeric value of the level
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Categories redacted at this level
    pub fn categories(&self) -> BTreeSet<EntityCategory> {
        LEVEL_TABLE[(self.0 - 1) as usize].iter().copied().collect()
    }

    /// All supported levels, ascending
    pub fn all() -> impl Iterator<Item = RedactionLevel> {
        (MIN_LEVEL..=MAX_LEVEL).map(|l| RedactionLevel(l as u8))
    }
}

impl Default for RedactionLevel {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<i64> for RedactionLevel {
    type Error = DocveilError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<RedactionLevel> for i64 {
    fn from(level: RedactionLevel) -> Self {
        level.0 as i64
    }
}

impl fmt::Display for RedactionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the engine treats a level outside 1-5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangeLevel {
    /// Redact nothing and log a warning
    #[default]
    Degrade,
    /// Fail with [`DocveilError::InvalidLevel`]
    Reject,
}

impl OutOfRangeLevel {
    /// Active categories for `level` under this policy
    pub fn active_categories(&self, level: i64) -> Result<BTreeSet<EntityCategory>> {
        match (self, RedactionLevel::new(level)) {
            (_, Ok(level)) => Ok(level.categories()),
            (Self::Degrade, Err(_)) => {
                tracing::warn!(level, "Redaction level out of range, no categories redacted");
                Ok(BTreeSet::new())
            }
            (Self::Reject, Err(e)) => Err(e),
        }
    }
}

impl fmt::Display for OutOfRangeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Degrade => write!(f, "degrade"),
            Self::Reject => write!(f, "reject"),
        }
    }
}
