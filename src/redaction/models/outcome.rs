//! Redaction run outcome

use super::entity::{Annotation, EntityCategory, ReplacementDecision};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Categorical sentiment label returned by a classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn is_negative(&self) -> bool {
        matches!(self, Self::Negative)
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => f.write_str("POSITIVE"),
            Self::Negative => f.write_str("NEGATIVE"),
            Self::Neutral => f.write_str("NEUTRAL"),
        }
    }
}

/// Sentiment measured over the intermediate redacted text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentReading {
    /// Polarity score in [-1, 1]
    pub polarity: f64,
    /// Classifier label, `None` when the classifier was not consulted or
    /// had no opinion
    pub label: Option<SentimentLabel>,
}

/// What triggered an escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationReason {
    /// Polarity fell below the configured threshold
    NegativePolarity,
    /// The categorical classifier labeled the text negative
    NegativeClassification,
}

/// Which pass produced the final text
///
/// Precedence is `Escalated` over `SecondaryPass` over `PrimaryPassOnly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Decision {
    /// Whole document replaced by the escalation marker
    Escalated { reason: EscalationReason },
    /// Final text comes from the secondary anonymization of the original
    SecondaryPass,
    /// Final text is the primary entity/placeholder rewrite
    PrimaryPassOnly,
}

impl Decision {
    pub fn is_escalated(&self) -> bool {
        matches!(self, Self::Escalated { .. })
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Escalated { reason } => write!(f, "escalated ({reason:?})"),
            Self::SecondaryPass => f.write_str("secondary_pass"),
            Self::PrimaryPassOnly => f.write_str("primary_pass_only"),
        }
    }
}

/// Result of one redaction run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactedText {
    /// Identifier of this run, shared by logs and the audit trail
    pub run_id: Uuid,
    /// Text to download
    pub text: String,
    /// Which pass produced `text`
    pub decision: Decision,
    /// Output of the primary entity/placeholder pass
    pub primary_text: String,
    /// Requested level, as given
    pub level: i64,
    /// Whether synthetic substitution was requested
    pub use_synthetic: bool,
    /// Categories active for this run
    pub active_categories: Vec<EntityCategory>,
    /// Replacements that produced the output
    pub decisions: Vec<ReplacementDecision>,
    /// Entity annotations of the original text
    pub annotations: Vec<Annotation>,
    /// Sentiment over the intermediate text
    pub sentiment: SentimentReading,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Timestamp of the run
    pub timestamp: DateTime<Utc>,
    /// Replacement counts by category
    pub stats_by_category: BTreeMap<EntityCategory, usize>,
}

impl RedactedText {
    /// Total number of replacement decisions
    pub fn total_replacements(&self) -> usize {
        self.decisions.len()
    }

    /// Whether the whole document was replaced by the escalation marker
    pub fn was_escalated(&self) -> bool {
        self.decision.is_escalated()
    }

    pub(crate) fn count_by_category(
        decisions: &[ReplacementDecision],
    ) -> BTreeMap<EntityCategory, usize> {
        let mut stats = BTreeMap::new();
        for decision in decisions {
            *stats.entry(decision.span.category).or_insert(0) += 1;
        }
        stats
    }
}
