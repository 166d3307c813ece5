//! Sentiment capabilities
//!
//! The engine consumes two independent signals over the intermediate redacted
//! text: a continuous polarity score and a categorical label. Both are traits so
//! that model-backed implementations can replace the lexicon-based defaults.

pub mod classifier;
pub mod lexicon;

use crate::redaction::models::SentimentLabel;
use anyhow::Result;

pub use classifier::LexiconClassifier;
pub use lexicon::LexiconScorer;

/// Continuous polarity scoring
pub trait SentimentScorer: Send + Sync {
    /// Polarity of `text` in [-1, 1]
    fn score(&self, text: &str) -> Result<f64>;

    /// Short name used in logs and error messages
    fn name(&self) -> &'static str;
}

/// Categorical sentiment classification
pub trait SentimentClassifier: Send + Sync {
    /// Label for `text`, `None` when the classifier has no opinion
    fn classify(&self, text: &str) -> Result<Option<SentimentLabel>>;

    /// Short name used in logs and error messages
    fn name(&self) -> &'static str;
}
