//! Regex-based entity detector

use super::{patterns::PatternRegistry, EntityDetector};
use crate::redaction::models::{EntityCategory, EntitySpan};
use anyhow::Result;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

/// Candidate match before overlap resolution
#[derive(Debug, Clone)]
struct Candidate {
    span: EntitySpan,
    confidence: f32,
}

/// Regex-based entity detector
///
/// Every pattern above the confidence threshold is matched against the text;
/// overlapping matches are resolved by confidence, then length, then position,
/// so the output never contains overlapping spans.
pub struct PatternDetector {
    pattern_registry: Arc<PatternRegistry>,
    confidence_threshold: f32,
    categories: Option<HashSet<EntityCategory>>,
}

impl PatternDetector {
    /// Create a new detector with the built-in patterns
    pub fn new() -> Result<Self> {
        let registry = PatternRegistry::default_patterns()?;
        Ok(Self::with_registry(registry))
    }

    /// Create a new detector with a custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            pattern_registry: Arc::new(registry),
            confidence_threshold: 0.5,
            categories: None,
        }
    }

    /// Set the confidence threshold
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Only report the given categories
    ///
    /// Filtered categories still take part in overlap resolution, so a
    /// filtered match keeps weaker matches of reported categories off its text.
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = EntityCategory>) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    fn wants(&self, category: EntityCategory) -> bool {
        self.categories
            .as_ref()
            .map_or(true, |allowed| allowed.contains(&category))
    }

    fn collect_candidates(&self, text: &str) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for pattern in self.pattern_registry.all_patterns() {
            if pattern.confidence < self.confidence_threshold {
                continue;
            }

            for matched in pattern.regex.find_iter(text) {
                if matched.as_str().trim().is_empty() {
                    continue;
                }
                candidates.push(Candidate {
                    span: EntitySpan::new(
                        pattern.category,
                        matched.as_str(),
                        matched.start(),
                        matched.end(),
                    ),
                    confidence: pattern.confidence,
                });
            }
        }

        candidates
    }

    /// Keep the strongest candidates so that no two spans overlap
    fn resolve(mut candidates: Vec<Candidate>) -> Vec<EntitySpan> {
        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.span.len().cmp(&a.span.len()))
                .then_with(|| a.span.start.cmp(&b.span.start))
                .then_with(|| a.span.category.cmp(&b.span.category))
        });

        let mut accepted: Vec<EntitySpan> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if accepted.iter().all(|kept| !kept.overlaps(&candidate.span)) {
                accepted.push(candidate.span);
            }
        }

        accepted.sort_by_key(|span| span.start);
        accepted
    }
}

impl EntityDetector for PatternDetector {
    fn detect(&self, text: &str) -> Result<Vec<EntitySpan>> {
        let spans: Vec<EntitySpan> = Self::resolve(self.collect_candidates(text))
            .into_iter()
            .filter(|span| self.wants(span.category))
            .collect();
        tracing::trace!(span_count = spans.len(), "Pattern detection complete");
        Ok(spans)
    }

    fn name(&self) -> &'static str {
        "pattern_detector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(spans: &[EntitySpan]) -> Vec<(EntityCategory, &str)> {
        spans.iter().map(|s| (s.category, s.text.as_str())).collect()
    }

    #[test]
    fn test_detect_scenario_sentence() {
        let detector = PatternDetector::new().unwrap();
        let spans = detector
            .detect("John Smith works at Acme Corp in Paris on 2024-01-01.")
            .unwrap();

        assert_eq!(
            labels(&spans),
            vec![
                (EntityCategory::Person, "John Smith"),
                (EntityCategory::Org, "Acme Corp"),
                (EntityCategory::Gpe, "Paris"),
                (EntityCategory::Date, "2024-01-01"),
            ]
        );
    }

    #[test]
    fn test_repeated_names_are_separate_spans() {
        let detector = PatternDetector::new().unwrap();
        let spans = detector.detect("Ann met Ann in the Annex").unwrap();

        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].start, spans[0].end), (0, 3));
        assert_eq!((spans[1].start, spans[1].end), (8, 11));
    }

    #[test]
    fn test_no_overlapping_spans() {
        let detector = PatternDetector::new().unwrap();
        let text = "Paid $1,200 on 03/04/2023, call (555) 123-4567 or mail ann@example.com";
        let spans = detector.detect(text).unwrap();

        for pair in spans.windows(2) {
            assert!(!pair[0].overlaps(&pair[1]), "{:?} overlaps {:?}", pair[0], pair[1]);
        }
        let found = labels(&spans);
        assert!(found.contains(&(EntityCategory::Money, "$1,200")));
        assert!(found.contains(&(EntityCategory::Date, "03/04/2023")));
        assert!(found.contains(&(EntityCategory::Phone, "(555) 123-4567")));
        assert!(found.contains(&(EntityCategory::Email, "ann@example.com")));
    }

    #[test]
    fn test_spans_match_source_offsets() {
        let detector = PatternDetector::new().unwrap();
        let text = "Café owner Mary Jones moved to Berlin with 3 cats";
        for span in detector.detect(text).unwrap() {
            assert!(span.validate_against(text).is_ok());
        }
    }

    #[test]
    fn test_category_filter() {
        let detector = PatternDetector::new()
            .unwrap()
            .with_categories([EntityCategory::Date]);
        let spans = detector
            .detect("John Smith works at Acme Corp in Paris on 2024-01-01.")
            .unwrap();
        assert_eq!(labels(&spans), vec![(EntityCategory::Date, "2024-01-01")]);
    }

    #[test]
    fn test_filtered_category_still_claims_its_text() {
        let detector = PatternDetector::new()
            .unwrap()
            .with_categories([EntityCategory::Cardinal]);
        let spans = detector.detect("call 555-123-4567 for 3 tickets").unwrap();
        assert_eq!(labels(&spans), vec![(EntityCategory::Cardinal, "3")]);
    }

    #[test]
    fn test_confidence_threshold_skips_weak_patterns() {
        let detector = PatternDetector::new()
            .unwrap()
            .with_confidence_threshold(0.7);
        let spans = detector.detect("There were 42 of them").unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_empty_text() {
        let detector = PatternDetector::new().unwrap();
        assert!(detector.detect("").unwrap().is_empty());
    }
}
