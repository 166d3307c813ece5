//! Process-wide capability registry
//!
//! Detectors, scorers and generators are built once and shared read-only by
//! every session. The registry is initialized lazily on first use, or
//! explicitly through [`install`] before that.

use crate::redaction::config::DetectorConfig;
use crate::redaction::detector::patterns::PatternRegistry;
use crate::redaction::detector::regex::PatternDetector;
use crate::redaction::detector::EntityDetector;
use crate::redaction::models::EntityCategory;
use crate::redaction::policy::{categories_for, MAX_LEVEL};
use crate::redaction::secondary::{SecondaryAnonymizer, TagAnonymizer};
use crate::redaction::sentiment::{
    LexiconClassifier, LexiconScorer, SentimentClassifier, SentimentScorer,
};
use crate::redaction::synthetic::{FakeGenerator, SyntheticGenerator};
use anyhow::{anyhow, Context, Result};
use std::sync::{Arc, OnceLock};

static REGISTRY: OnceLock<Capabilities> = OnceLock::new();

/// Set of capabilities consumed by the redaction engine
#[derive(Clone)]
pub struct Capabilities {
    /// Primary entity detector
    pub detector: Arc<dyn EntityDetector>,
    /// Independent analyzer feeding the secondary pass
    pub secondary_detector: Arc<dyn EntityDetector>,
    pub scorer: Arc<dyn SentimentScorer>,
    pub classifier: Arc<dyn SentimentClassifier>,
    pub generator: Arc<dyn SyntheticGenerator>,
    pub anonymizer: Arc<dyn SecondaryAnonymizer>,
}

impl Capabilities {
    /// Built-in rule-based capabilities with the default pattern library
    pub fn builtin() -> Result<Self> {
        Self::from_config(&DetectorConfig::default())
    }

    /// Built-in capabilities using the detector settings from configuration
    ///
    /// The primary detector only reports the categories a redaction level can
    /// activate; the secondary analyzer reports every category.
    pub fn from_config(config: &DetectorConfig) -> Result<Self> {
        let registry = match config.pattern_library {
            Some(ref path) => PatternRegistry::from_file(path)?,
            None => PatternRegistry::default_patterns()?,
        };

        let primary = PatternDetector::with_registry(registry.clone())
            .with_confidence_threshold(config.confidence_threshold)
            .with_categories(categories_for(MAX_LEVEL));
        let secondary = PatternDetector::with_registry(registry)
            .with_confidence_threshold(config.confidence_threshold)
            .with_categories(EntityCategory::ALL);

        Ok(Self {
            detector: Arc::new(primary),
            secondary_detector: Arc::new(secondary),
            scorer: Arc::new(LexiconScorer::new()),
            classifier: Arc::new(LexiconClassifier::new()),
            generator: Arc::new(FakeGenerator::new()),
            anonymizer: Arc::new(TagAnonymizer::new()),
        })
    }

    pub fn with_detector(mut self, detector: Arc<dyn EntityDetector>) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_secondary_detector(mut self, detector: Arc<dyn EntityDetector>) -> Self {
        self.secondary_detector = detector;
        self
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn SentimentScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn SentimentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn SyntheticGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_anonymizer(mut self, anonymizer: Arc<dyn SecondaryAnonymizer>) -> Self {
        self.anonymizer = anonymizer;
        self
    }
}

/// Shared capabilities, built from the defaults on first access
///
/// Concurrent first calls may each build a candidate; only one is kept and
/// every caller receives the same instance.
pub fn global() -> Result<&'static Capabilities> {
    if let Some(capabilities) = REGISTRY.get() {
        return Ok(capabilities);
    }

    let capabilities = Capabilities::builtin().context("Failed to build default capabilities")?;
    tracing::debug!("Initialized capability registry");
    let _ = REGISTRY.set(capabilities);

    REGISTRY
        .get()
        .ok_or_else(|| anyhow!("capability registry is not initialized"))
}

/// Install capabilities before first use
///
/// # Errors
///
/// Fails if the registry has already been initialized.
pub fn install(capabilities: Capabilities) -> Result<&'static Capabilities> {
    REGISTRY
        .set(capabilities)
        .map_err(|_| anyhow!("capability registry is already initialized"))?;

    tracing::debug!("Installed capability registry");
    REGISTRY
        .get()
        .ok_or_else(|| anyhow!("capability registry is not initialized"))
}

/// Shared capabilities, running `build` only when nothing is installed yet
///
/// A concurrent first caller may win the race, in which case its instance is
/// returned and the locally built one is dropped.
pub fn get_or_install<F>(build: F) -> Result<&'static Capabilities>
where
    F: FnOnce() -> Result<Capabilities>,
{
    if let Some(capabilities) = REGISTRY.get() {
        return Ok(capabilities);
    }

    let capabilities = build()?;
    if REGISTRY.set(capabilities).is_ok() {
        tracing::debug!("Installed capability registry");
    }

    REGISTRY
        .get()
        .ok_or_else(|| anyhow!("capability registry is not initialized"))
}
