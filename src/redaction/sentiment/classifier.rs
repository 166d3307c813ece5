//! Evidence-based categorical sentiment classifier

use super::lexicon::{tokenize, Lexicon};
use super::SentimentClassifier;
use crate::redaction::models::SentimentLabel;
use anyhow::Result;

/// Categorical classifier over lexicon evidence
///
/// Unlike the polarity score, the label weighs how much of the sentiment
/// evidence points one way: a text is `Negative` when negative valence
/// dominates by `dominance` and totals at least `min_evidence`.
#[derive(Debug, Clone)]
pub struct LexiconClassifier {
    lexicon: Lexicon,
    min_evidence: f64,
    dominance: f64,
}

impl LexiconClassifier {
    /// Create a classifier with the built-in lexicon
    pub fn new() -> Self {
        Self {
            lexicon: Lexicon::builtin(),
            min_evidence: 3.0,
            dominance: 0.75,
        }
    }

    /// Minimum total absolute valence before a polar label is returned
    pub fn with_min_evidence(mut self, min_evidence: f64) -> Self {
        self.min_evidence = min_evidence.max(0.0);
        self
    }

    /// Share of evidence one side must hold, in (0.5, 1.0]
    pub fn with_dominance(mut self, dominance: f64) -> Self {
        self.dominance = dominance.clamp(0.51, 1.0);
        self
    }

    fn label(&self, text: &str) -> Option<SentimentLabel> {
        if tokenize(text).is_empty() {
            return None;
        }

        let (negative, positive) = self
            .lexicon
            .token_valences(text)
            .into_iter()
            .fold((0.0_f64, 0.0_f64), |(neg, pos), v| {
                if v < 0.0 {
                    (neg - v, pos)
                } else {
                    (neg, pos + v)
                }
            });

        let total = negative + positive;
        if total < self.min_evidence || total == 0.0 {
            return Some(SentimentLabel::Neutral);
        }

        if negative / total >= self.dominance {
            Some(SentimentLabel::Negative)
        } else if positive / total >= self.dominance {
            Some(SentimentLabel::Positive)
        } else {
            Some(SentimentLabel::Neutral)
        }
    }
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentClassifier for LexiconClassifier {
    fn classify(&self, text: &str) -> Result<Option<SentimentLabel>> {
        Ok(self.label(text))
    }

    fn name(&self) -> &'static str {
        "lexicon_classifier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_label() {
        let classifier = LexiconClassifier::new();
        assert_eq!(classifier.classify("").unwrap(), None);
        assert_eq!(classifier.classify("  ... ").unwrap(), None);
    }

    #[test]
    fn test_neutral_text() {
        let classifier = LexiconClassifier::new();
        assert_eq!(
            classifier
                .classify("[NAME] works at [ORGANIZATION] in [LOCATION].")
                .unwrap(),
            Some(SentimentLabel::Neutral)
        );
    }

    #[test]
    fn test_negative_text() {
        let classifier = LexiconClassifier::new();
        assert_eq!(
            classifier
                .classify("fraud and violence and a lawsuit")
                .unwrap(),
            Some(SentimentLabel::Negative)
        );
    }

    #[test]
    fn test_mixed_text_is_neutral() {
        let classifier = LexiconClassifier::new();
        assert_eq!(
            classifier.classify("great food, terrible service").unwrap(),
            Some(SentimentLabel::Neutral)
        );
    }

    #[test]
    fn test_weak_evidence_is_neutral() {
        let classifier = LexiconClassifier::new();
        assert_eq!(
            classifier.classify("the train was late").unwrap(),
            Some(SentimentLabel::Neutral)
        );
        let eager = LexiconClassifier::new().with_min_evidence(0.5);
        assert_eq!(
            eager.classify("the train was late").unwrap(),
            Some(SentimentLabel::Negative)
        );
    }

    #[test]
    fn test_positive_text() {
        let classifier = LexiconClassifier::new();
        assert_eq!(
            classifier.classify("wonderful and excellent work").unwrap(),
            Some(SentimentLabel::Positive)
        );
    }
}
