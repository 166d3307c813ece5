//! Main redaction engine
//!
//! This module provides the [`RedactionEngine`] that turns raw document text
//! into a single redacted text.
//!
//! # Pipeline
//!
//! 1. Resolve the active categories for the requested level
//! 2. Validate detector spans and drop overlapping ones by category priority
//! 3. Rewrite the original text by offset, one replacement per active span
//! 4. Score the intermediate text and escalate when it reads as negative
//! 5. Reconcile with the secondary anonymization of the original text
//! 6. Annotate every surviving span of the original text for review
//!
//! # Examples
//!
//! ```no_run
//! use docveil::redaction::{Capabilities, RedactionConfig, RedactionEngine};
//!
//! # fn example() -> anyhow::Result<()> {
//! let engine = RedactionEngine::new(RedactionConfig::default(), Capabilities::builtin()?)?;
//! let result = engine.redact("John Smith works at Acme Corp in Paris.", 3, false)?;
//! println!("{} ({})", result.text, result.decision);
//! # Ok(())
//! # }
//! ```

use crate::domain::{DocveilError, Result};
use crate::redaction::audit::AuditLogger;
use crate::redaction::capabilities::Capabilities;
use crate::redaction::config::{RedactionConfig, ReconciliationPolicy};
use crate::redaction::models::{
    Annotation, Decision, EntitySpan, EscalationReason, RedactedText, ReplacementDecision,
    ReplacementReason, SentimentReading,
};
use crate::redaction::placeholder::PlaceholderResolver;
use crate::redaction::rewrite;
use anyhow::Context;
use chrono::Utc;
use std::time::Instant;
use uuid::Uuid;

/// Final outcome for a run
///
/// Escalation wins over everything; otherwise the reconciliation policy names
/// the pass that supplies the text.
pub fn reconcile(escalation: Option<EscalationReason>, policy: ReconciliationPolicy) -> Decision {
    match (escalation, policy) {
        (Some(reason), _) => Decision::Escalated { reason },
        (None, ReconciliationPolicy::SecondaryOverrides) => Decision::SecondaryPass,
        (None, ReconciliationPolicy::PrimaryOnly) => Decision::PrimaryPassOnly,
    }
}

/// Main redaction engine
///
/// The engine is immutable after construction and can be shared across
/// threads behind an `Arc`.
pub struct RedactionEngine {
    config: RedactionConfig,
    capabilities: Capabilities,
    resolver: PlaceholderResolver,
    audit_logger: Option<AuditLogger>,
}

impl RedactionEngine {
    /// Create a new engine
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: RedactionConfig, capabilities: Capabilities) -> anyhow::Result<Self> {
        config
            .validate()
            .context("Invalid redaction configuration")?;

        let resolver = PlaceholderResolver::new(capabilities.generator.clone());

        Ok(Self {
            config,
            capabilities,
            resolver,
            audit_logger: None,
        })
    }

    /// Record every run in the audit trail
    pub fn with_audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit_logger = Some(logger);
        self
    }

    pub fn config(&self) -> &RedactionConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Detect entities in `text` and redact it
    ///
    /// # Errors
    ///
    /// - [`DocveilError::CapabilityFailure`] if any capability fails or the
    ///   detector returns spans that do not fit the text
    /// - [`DocveilError::InvalidLevel`] for an out-of-range level when the
    ///   engine is configured to reject them
    pub fn redact(&self, text: &str, level: i64, use_synthetic: bool) -> Result<RedactedText> {
        let detector = &self.capabilities.detector;
        let spans = detector
            .detect(text)
            .map_err(|e| DocveilError::capability(detector.name(), e))?;

        self.redact_with_spans(text, level, use_synthetic, spans)
    }

    /// Redact `text` using spans produced elsewhere
    ///
    /// Spans are byte offsets into `text`. On escalation the primary decisions
    /// are reported with [`ReplacementReason::SentimentEscalation`], since the
    /// marker superseded them.
    pub fn redact_with_spans(
        &self,
        text: &str,
        level: i64,
        use_synthetic: bool,
        spans: Vec<EntitySpan>,
    ) -> Result<RedactedText> {
        let start = Instant::now();
        crate::log_redaction_start!(level, use_synthetic, text.len());

        let active = self.config.out_of_range_levels.active_categories(level)?;

        let detector_name = self.capabilities.detector.name();
        validate_spans(text, &spans, detector_name)?;
        let surviving = rewrite::resolve_overlaps(&spans);

        let mut primary_decisions = Vec::new();
        for span in surviving.iter().filter(|s| active.contains(&s.category)) {
            let replacement = self
                .resolver
                .resolve(span.category, &span.text, use_synthetic)?;
            primary_decisions.push(ReplacementDecision::new(
                span.clone(),
                replacement,
                ReplacementReason::PolicyMatch,
            ));
        }

        let primary_text = rewrite::apply(
            text,
            primary_decisions
                .iter()
                .map(|d| (&d.span, d.replacement.as_str())),
        )
        .map_err(|message| DocveilError::CapabilityFailure {
            capability: detector_name,
            message,
        })?;

        tracing::debug!(
            span_count = surviving.len(),
            active_count = active.len(),
            replaced = primary_decisions.len(),
            "Primary pass complete"
        );

        let (sentiment, escalation) = self.assess_sentiment(&primary_text)?;
        let decision = reconcile(escalation, self.config.reconciliation);

        let (final_text, decisions) = match decision {
            Decision::Escalated { reason } => {
                tracing::info!(?reason, polarity = sentiment.polarity, "Sentiment escalation");
                let marker = self.config.escalation.marker_for(reason).to_string();
                let decisions = primary_decisions
                    .into_iter()
                    .map(|d| {
                        ReplacementDecision::new(
                            d.span,
                            marker.clone(),
                            ReplacementReason::SentimentEscalation,
                        )
                    })
                    .collect();
                (marker, decisions)
            }
            Decision::SecondaryPass => self.secondary_pass(text)?,
            Decision::PrimaryPassOnly => (primary_text.clone(), primary_decisions),
        };

        let annotations = surviving
            .iter()
            .map(|span| Annotation::from_span(span, active.contains(&span.category)))
            .collect();

        let elapsed = start.elapsed();
        let result = RedactedText {
            run_id: Uuid::new_v4(),
            text: final_text,
            decision,
            primary_text,
            level,
            use_synthetic,
            active_categories: active.into_iter().collect(),
            stats_by_category: RedactedText::count_by_category(&decisions),
            decisions,
            annotations,
            sentiment,
            processing_time_ms: elapsed.as_millis() as u64,
            timestamp: Utc::now(),
        };

        if let Some(ref logger) = self.audit_logger {
            logger
                .log_redaction(&result)
                .map_err(|e| DocveilError::Io(format!("{e:#}")))?;
        }

        crate::log_redaction_complete!(result.decision, result.total_replacements(), elapsed);
        Ok(result)
    }

    /// Polarity first; the classifier is only asked when polarity does not
    /// already escalate
    fn assess_sentiment(
        &self,
        text: &str,
    ) -> Result<(SentimentReading, Option<EscalationReason>)> {
        let scorer = &self.capabilities.scorer;
        let polarity = scorer
            .score(text)
            .map_err(|e| DocveilError::capability(scorer.name(), e))?;

        if !polarity.is_finite() {
            return Err(DocveilError::CapabilityFailure {
                capability: scorer.name(),
                message: format!("polarity score is not a finite number: {polarity}"),
            });
        }

        if polarity < self.config.escalation.polarity_threshold {
            let reading = SentimentReading {
                polarity,
                label: None,
            };
            return Ok((reading, Some(EscalationReason::NegativePolarity)));
        }

        if !self.config.escalation.classifier_enabled {
            let reading = SentimentReading {
                polarity,
                label: None,
            };
            return Ok((reading, None));
        }

        let classifier = &self.capabilities.classifier;
        let label = classifier
            .classify(text)
            .map_err(|e| DocveilError::capability(classifier.name(), e))?;

        let escalation = label
            .filter(|l| l.is_negative())
            .map(|_| EscalationReason::NegativeClassification);

        Ok((SentimentReading { polarity, label }, escalation))
    }

    /// Independent analysis and anonymization of the original text
    fn secondary_pass(&self, text: &str) -> Result<(String, Vec<ReplacementDecision>)> {
        let analyzer = &self.capabilities.secondary_detector;
        let spans = analyzer
            .detect(text)
            .map_err(|e| DocveilError::capability(analyzer.name(), e))?;
        validate_spans(text, &spans, analyzer.name())?;
        let spans = rewrite::resolve_overlaps(&spans);

        let anonymizer = &self.capabilities.anonymizer;
        let anonymized = anonymizer
            .anonymize(text, &spans)
            .map_err(|e| DocveilError::capability(anonymizer.name(), e))?;

        tracing::debug!(span_count = spans.len(), "Secondary pass complete");

        let decisions = spans
            .into_iter()
            .map(|span| {
                let replacement = anonymizer.replacement_for(span.category);
                ReplacementDecision::new(span, replacement, ReplacementReason::SecondaryPass)
            })
            .collect();

        Ok((anonymized, decisions))
    }
}

fn validate_spans(text: &str, spans: &[EntitySpan], capability: &'static str) -> Result<()> {
    for span in spans {
        span.validate_against(text)
            .map_err(|message| DocveilError::CapabilityFailure {
                capability,
                message,
            })?;
    }
    Ok(())
}
