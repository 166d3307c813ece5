//! Entity data models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity category produced by the detectors
///
/// The declaration order is the redaction priority: when two detected spans
/// overlap, the one whose category comes first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityCategory {
    /// People, including fictional
    Person,
    /// Companies, agencies, institutions
    Org,
    /// Countries, cities, states
    Gpe,
    /// Non-GPE locations, street addresses
    Loc,
    /// Absolute or relative dates
    Date,
    /// Monetary values
    Money,
    /// Numerals that do not fall under another type
    Cardinal,
    /// Document or account identifiers
    Id,
    /// Email addresses
    Email,
    /// Telephone numbers
    Phone,
}

impl EntityCategory {
    /// All categories in priority order
    pub const ALL: [EntityCategory; 10] = [
        Self::Person,
        Self::Org,
        Self::Gpe,
        Self::Loc,
        Self::Date,
        Self::Money,
        Self::Cardinal,
        Self::Id,
        Self::Email,
        Self::Phone,
    ];

    /// Detector label for the category
    pub fn label(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Org => "ORG",
            Self::Gpe => "GPE",
            Self::Loc => "LOC",
            Self::Date => "DATE",
            Self::Money => "MONEY",
            Self::Cardinal => "CARDINAL",
            Self::Id => "ID",
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
        }
    }

    /// Priority rank, lower wins
    pub fn priority(&self) -> usize {
        *self as usize
    }

    /// Parse a detector label (case-insensitive, a few common aliases)
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "PERSON" | "PER" | "NAME" => Some(Self::Person),
            "ORG" | "ORGANIZATION" => Some(Self::Org),
            "GPE" => Some(Self::Gpe),
            "LOC" | "LOCATION" | "ADDRESS" => Some(Self::Loc),
            "DATE" | "DATE_TIME" => Some(Self::Date),
            "MONEY" => Some(Self::Money),
            "CARDINAL" | "NUMBER" => Some(Self::Cardinal),
            "ID" | "IDENTIFIER" => Some(Self::Id),
            "EMAIL" | "EMAIL_ADDRESS" => Some(Self::Email),
            "PHONE" | "PHONE_NUMBER" => Some(Self::Phone),
            _ => None,
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Labeled span of the original text
///
/// `start` and `end` are byte offsets into the text the detector was run on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Entity category
    pub category: EntityCategory,
    /// Matched text, equal to `original[start..end]`
    pub text: String,
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl EntitySpan {
    /// Create a new span
    pub fn new(category: EntityCategory, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            category,
            text: text.into(),
            start,
            end,
        }
    }

    /// Build a span from offsets, taking the matched text from `source`
    ///
    /// Returns `None` when the offsets are not a valid range of `source`.
    pub fn from_offsets(
        category: EntityCategory,
        source: &str,
        start: usize,
        end: usize,
    ) -> Option<Self> {
        source
            .get(start..end)
            .map(|text| Self::new(category, text, start, end))
    }

    /// Byte length of the span
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether two spans share at least one byte
    pub fn overlaps(&self, other: &EntitySpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check the offset invariants against the text the span came from
    pub fn validate_against(&self, source: &str) -> Result<(), String> {
        if self.start >= self.end {
            return Err(format!(
                "span {}..{} ({}) is empty or reversed",
                self.start, self.end, self.category
            ));
        }
        match source.get(self.start..self.end) {
            Some(slice) if slice == self.text => Ok(()),
            Some(_) => Err(format!(
                "span {}..{} ({}) does not match its recorded text",
                self.start, self.end, self.category
            )),
            None => Err(format!(
                "span {}..{} ({}) is out of bounds or splits a character (text length {})",
                self.start,
                self.end,
                self.category,
                source.len()
            )),
        }
    }
}

/// Why a span received its replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementReason {
    /// Category active at the requested level
    PolicyMatch,
    /// Whole document replaced by the escalation marker
    SentimentEscalation,
    /// Replaced by the secondary anonymization pass
    SecondaryPass,
}

/// One replacement made during a redaction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplacementDecision {
    /// Span that was replaced
    pub span: EntitySpan,
    /// Replacement text written in place of the span
    pub replacement: String,
    /// Reason for the replacement
    pub reason: ReplacementReason,
}

impl ReplacementDecision {
    /// Create a new decision
    pub fn new(span: EntitySpan, replacement: String, reason: ReplacementReason) -> Self {
        Self {
            span,
            replacement,
            reason,
        }
    }
}

/// Entity annotation of the original text, used for human review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Entity category
    pub category: EntityCategory,
    /// Annotated text
    pub text: String,
    /// Start byte offset
    pub start: usize,
    /// End byte offset
    pub end: usize,
    /// Whether the category was active at the requested level
    pub redacted: bool,
}

impl Annotation {
    /// Annotate a span
    pub fn from_span(span: &EntitySpan, redacted: bool) -> Self {
        Self {
            category: span.category,
            text: span.text.clone(),
            start: span.start,
            end: span.end,
            redacted,
        }
    }
}
