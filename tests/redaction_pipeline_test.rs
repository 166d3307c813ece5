//! End-to-end tests for the redaction pipeline through the public API

use docveil::domain::DocveilError;
use docveil::redaction::detector::EntityDetector;
use docveil::redaction::models::{EscalationReason, ReplacementReason, SentimentLabel};
use docveil::redaction::sentiment::{SentimentClassifier, SentimentScorer};
use docveil::redaction::synthetic::FakeGenerator;
use docveil::redaction::{
    categories_for, Capabilities, Decision, EntityCategory, EntitySpan, OutOfRangeLevel,
    ReconciliationPolicy, RedactionConfig, RedactionEngine,
};
use std::sync::Arc;
use test_case::test_case;

const SCENARIO: &str = "John Smith works at Acme Corp in Paris on 2024-01-01.";

/// Detector returning the scenario entities with their byte offsets
struct ScenarioDetector;

impl EntityDetector for ScenarioDetector {
    fn detect(&self, text: &str) -> anyhow::Result<Vec<EntitySpan>> {
        let entities = [
            (EntityCategory::Person, "John Smith"),
            (EntityCategory::Org, "Acme Corp"),
            (EntityCategory::Gpe, "Paris"),
            (EntityCategory::Date, "2024-01-01"),
        ];
        Ok(entities
            .iter()
            .filter_map(|(category, value)| {
                text.find(value)
                    .map(|start| EntitySpan::new(*category, *value, start, start + value.len()))
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "scenario_detector"
    }
}

struct FixedScorer(f64);

impl SentimentScorer for FixedScorer {
    fn score(&self, _text: &str) -> anyhow::Result<f64> {
        Ok(self.0)
    }

    fn name(&self) -> &'static str {
        "fixed_scorer"
    }
}

struct FixedClassifier(Option<SentimentLabel>);

impl SentimentClassifier for FixedClassifier {
    fn classify(&self, _text: &str) -> anyhow::Result<Option<SentimentLabel>> {
        Ok(self.0)
    }

    fn name(&self) -> &'static str {
        "fixed_classifier"
    }
}

struct UnavailableScorer;

impl SentimentScorer for UnavailableScorer {
    fn score(&self, _text: &str) -> anyhow::Result<f64> {
        anyhow::bail!("sentiment model unavailable")
    }

    fn name(&self) -> &'static str {
        "unavailable_scorer"
    }
}

fn capabilities(score: f64, label: Option<SentimentLabel>) -> Capabilities {
    Capabilities::builtin()
        .unwrap()
        .with_detector(Arc::new(ScenarioDetector))
        .with_secondary_detector(Arc::new(ScenarioDetector))
        .with_scorer(Arc::new(FixedScorer(score)))
        .with_classifier(Arc::new(FixedClassifier(label)))
        .with_generator(Arc::new(FakeGenerator::seeded(7)))
}

fn engine(policy: ReconciliationPolicy, caps: Capabilities) -> RedactionEngine {
    let config = RedactionConfig {
        reconciliation: policy,
        ..Default::default()
    };
    RedactionEngine::new(config, caps).unwrap()
}

#[test_case(1, "[NAME] works at Acme Corp in Paris on 2024-01-01." ; "level 1")]
#[test_case(2, "[NAME] works at [ORGANIZATION] in Paris on 2024-01-01." ; "level 2")]
#[test_case(3, "[NAME] works at [ORGANIZATION] in [LOCATION] on 2024-01-01." ; "level 3")]
#[test_case(4, "[NAME] works at [ORGANIZATION] in [LOCATION] on [DATE]." ; "level 4")]
fn test_primary_text_per_level(level: i64, expected: &str) {
    let engine = engine(
        ReconciliationPolicy::PrimaryOnly,
        capabilities(0.0, Some(SentimentLabel::Neutral)),
    );
    let result = engine.redact(SCENARIO, level, false).unwrap();

    assert_eq!(result.decision, Decision::PrimaryPassOnly);
    assert_eq!(result.text, expected);
    assert_eq!(result.primary_text, expected);
}

#[test]
fn test_secondary_pass_overrides_primary() {
    let engine = engine(
        ReconciliationPolicy::SecondaryOverrides,
        capabilities(0.0, Some(SentimentLabel::Neutral)),
    );
    let result = engine.redact(SCENARIO, 3, false).unwrap();

    assert_eq!(result.decision, Decision::SecondaryPass);
    assert_eq!(
        result.primary_text,
        "[NAME] works at [ORGANIZATION] in [LOCATION] on 2024-01-01."
    );
    assert_eq!(
        result.text,
        "<PERSON> works at <ORGANIZATION> in <LOCATION> on <DATE_TIME>."
    );
    assert!(result
        .decisions
        .iter()
        .all(|d| d.reason == ReplacementReason::SecondaryPass));
}

#[test]
fn test_level_5_synthetic_values() {
    let engine = engine(
        ReconciliationPolicy::PrimaryOnly,
        capabilities(0.0, Some(SentimentLabel::Neutral)),
    );
    let result = engine.redact(SCENARIO, 5, true).unwrap();

    assert!(!result.text.contains("John Smith"));
    assert!(!result.text.contains("Acme Corp"));
    assert!(!result.text.contains("2024-01-01"));

    let date = result
        .decisions
        .iter()
        .find(|d| d.span.category == EntityCategory::Date)
        .unwrap();
    let bytes = date.replacement.as_bytes();
    assert_eq!(bytes.len(), 10);
    assert_eq!(bytes[4], b'-');
    assert_eq!(bytes[7], b'-');
}

#[test_case(1 ; "level 1")]
#[test_case(5 ; "level 5")]
fn test_negative_polarity_escalates_at_any_level(level: i64) {
    let engine = engine(
        ReconciliationPolicy::SecondaryOverrides,
        capabilities(-0.8, Some(SentimentLabel::Neutral)),
    );
    let result = engine.redact(SCENARIO, level, false).unwrap();

    assert_eq!(
        result.decision,
        Decision::Escalated {
            reason: EscalationReason::NegativePolarity
        }
    );
    assert_eq!(result.text, "[REDACTED DUE TO SENSITIVE SENTIMENT]");
}

#[test]
fn test_negative_label_escalates() {
    let engine = engine(
        ReconciliationPolicy::SecondaryOverrides,
        capabilities(-0.1, Some(SentimentLabel::Negative)),
    );
    let result = engine.redact(SCENARIO, 3, false).unwrap();

    assert_eq!(
        result.decision,
        Decision::Escalated {
            reason: EscalationReason::NegativeClassification
        }
    );
}

#[test]
fn test_classification_marker_applies_to_label_escalation_only() {
    let mut config = RedactionConfig::default();
    config.escalation.classification_marker =
        Some("[REDACTED DUE TO NEGATIVE CLASSIFICATION]".to_string());

    let by_label = RedactionEngine::new(
        config.clone(),
        capabilities(-0.1, Some(SentimentLabel::Negative)),
    )
    .unwrap();
    let result = by_label.redact(SCENARIO, 3, false).unwrap();
    assert_eq!(result.text, "[REDACTED DUE TO NEGATIVE CLASSIFICATION]");

    let by_polarity =
        RedactionEngine::new(config, capabilities(-0.8, Some(SentimentLabel::Negative))).unwrap();
    let result = by_polarity.redact(SCENARIO, 3, false).unwrap();
    assert_eq!(result.text, "[REDACTED DUE TO SENSITIVE SENTIMENT]");
}

#[test]
fn test_threshold_is_strict() {
    let engine = engine(
        ReconciliationPolicy::PrimaryOnly,
        capabilities(-0.3, Some(SentimentLabel::Neutral)),
    );
    let result = engine.redact(SCENARIO, 3, false).unwrap();
    assert_eq!(result.decision, Decision::PrimaryPassOnly);
}

#[test_case(0 ; "zero")]
#[test_case(6 ; "above range")]
#[test_case(-1 ; "negative")]
fn test_out_of_range_levels(level: i64) {
    let degrade = engine(
        ReconciliationPolicy::PrimaryOnly,
        capabilities(0.0, Some(SentimentLabel::Neutral)),
    );
    let result = degrade.redact(SCENARIO, level, false).unwrap();
    assert_eq!(result.text, SCENARIO);
    assert!(result.decisions.is_empty());
    assert!(categories_for(level).is_empty());

    let config = RedactionConfig {
        out_of_range_levels: OutOfRangeLevel::Reject,
        ..Default::default()
    };
    let reject =
        RedactionEngine::new(config, capabilities(0.0, Some(SentimentLabel::Neutral))).unwrap();
    assert!(matches!(
        reject.redact(SCENARIO, level, false),
        Err(DocveilError::InvalidLevel(l)) if l == level
    ));
}

#[test]
fn test_levels_are_monotonic() {
    for level in 1..5 {
        let lower = categories_for(level);
        let higher = categories_for(level + 1);
        assert!(lower.is_subset(&higher));
        assert!(lower.len() < higher.len());
    }
}

#[test]
fn test_capability_failure_names_capability() {
    let caps = capabilities(0.0, None).with_scorer(Arc::new(UnavailableScorer));
    let engine = engine(ReconciliationPolicy::SecondaryOverrides, caps);

    match engine.redact(SCENARIO, 3, false) {
        Err(DocveilError::CapabilityFailure {
            capability,
            message,
        }) => {
            assert_eq!(capability, "unavailable_scorer");
            assert!(message.contains("sentiment model unavailable"));
        }
        other => panic!("expected capability failure, got {other:?}"),
    }
}

fn builtin_engine(policy: ReconciliationPolicy) -> RedactionEngine {
    let config = RedactionConfig {
        reconciliation: policy,
        ..Default::default()
    };
    RedactionEngine::new(config, Capabilities::builtin().unwrap()).unwrap()
}

#[test_case("call 555-123-4567" ; "phone only")]
#[test_case("Email jane.doe@example.com or call 555-123-4567." ; "email and phone")]
fn test_categories_outside_every_level_are_untouched(text: &str) {
    let engine = builtin_engine(ReconciliationPolicy::PrimaryOnly);
    let result = engine.redact(text, 5, false).unwrap();

    assert_eq!(result.decision, Decision::PrimaryPassOnly);
    assert_eq!(result.text, text);
    assert!(result.decisions.is_empty());
}

#[test]
fn test_builtin_secondary_pass_tags_contact_details() {
    let engine = builtin_engine(ReconciliationPolicy::SecondaryOverrides);
    let result = engine
        .redact("Email jane.doe@example.com or call 555-123-4567.", 5, false)
        .unwrap();

    assert_eq!(result.decision, Decision::SecondaryPass);
    assert_eq!(result.text, "Email <EMAIL_ADDRESS> or call <PHONE_NUMBER>.");
}

#[test]
fn test_builtin_lexicon_escalates() {
    let engine = builtin_engine(ReconciliationPolicy::PrimaryOnly);
    let result = engine
        .redact(
            "I hate this terrible, awful place and I want to kill them.",
            1,
            false,
        )
        .unwrap();
    assert!(result.was_escalated());
    assert_eq!(result.text, "[REDACTED DUE TO SENSITIVE SENTIMENT]");
}
