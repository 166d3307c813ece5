//! Redaction configuration

use crate::redaction::models::EscalationReason;
use crate::redaction::policy::{OutOfRangeLevel, MAX_LEVEL, MIN_LEVEL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Marker that replaces the whole document on escalation
pub const DEFAULT_ESCALATION_MARKER: &str = "[REDACTED DUE TO SENSITIVE SENTIMENT]";

/// Which pass supplies the final text when no escalation happens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationPolicy {
    /// The secondary anonymization of the original text is the output
    #[default]
    SecondaryOverrides,
    /// The primary entity/placeholder rewrite is the output
    PrimaryOnly,
}

impl fmt::Display for ReconciliationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SecondaryOverrides => write!(f, "secondary_overrides"),
            Self::PrimaryOnly => write!(f, "primary_only"),
        }
    }
}

/// `[redaction]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionConfig {
    /// Level used when the caller does not pass one
    #[serde(default = "default_level")]
    pub default_level: i64,

    /// Substitute synthetic values instead of placeholders
    #[serde(default)]
    pub use_synthetic: bool,

    /// Behavior for levels outside 1-5
    #[serde(default)]
    pub out_of_range_levels: OutOfRangeLevel,

    /// Final-text reconciliation between the two passes
    #[serde(default)]
    pub reconciliation: ReconciliationPolicy,

    #[serde(default)]
    pub escalation: EscalationConfig,
}

fn default_level() -> i64 {
    3
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            default_level: default_level(),
            use_synthetic: false,
            out_of_range_levels: OutOfRangeLevel::default(),
            reconciliation: ReconciliationPolicy::default(),
            escalation: EscalationConfig::default(),
        }
    }
}

impl RedactionConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&self.default_level) {
            anyhow::bail!(
                "redaction.default_level must be between {MIN_LEVEL} and {MAX_LEVEL}, got {}",
                self.default_level
            );
        }

        self.escalation
            .validate()
            .context("Invalid escalation configuration")?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("DOCVEIL_REDACTION_DEFAULT_LEVEL") {
            self.default_level = val
                .parse()
                .context("Invalid DOCVEIL_REDACTION_DEFAULT_LEVEL value")?;
        }

        if let Ok(val) = std::env::var("DOCVEIL_REDACTION_USE_SYNTHETIC") {
            self.use_synthetic = val
                .parse()
                .context("Invalid DOCVEIL_REDACTION_USE_SYNTHETIC value")?;
        }

        if let Ok(val) = std::env::var("DOCVEIL_REDACTION_OUT_OF_RANGE_LEVELS") {
            self.out_of_range_levels = match val.to_lowercase().as_str() {
                "degrade" => OutOfRangeLevel::Degrade,
                "reject" => OutOfRangeLevel::Reject,
                _ => anyhow::bail!("Invalid DOCVEIL_REDACTION_OUT_OF_RANGE_LEVELS: {}", val),
            };
        }

        if let Ok(val) = std::env::var("DOCVEIL_REDACTION_RECONCILIATION") {
            self.reconciliation = match val.to_lowercase().as_str() {
                "secondary_overrides" => ReconciliationPolicy::SecondaryOverrides,
                "primary_only" => ReconciliationPolicy::PrimaryOnly,
                _ => anyhow::bail!("Invalid DOCVEIL_REDACTION_RECONCILIATION: {}", val),
            };
        }

        self.escalation.apply_env_overrides()?;

        Ok(())
    }
}

/// `[redaction.escalation]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationConfig {
    /// Escalate when polarity is strictly below this value
    #[serde(default = "default_polarity_threshold")]
    pub polarity_threshold: f64,

    /// Consult the categorical classifier when polarity does not escalate
    #[serde(default = "default_classifier_enabled")]
    pub classifier_enabled: bool,

    /// Text that replaces the whole document on escalation
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Replacement used when only the classifier escalated; `marker` when unset
    #[serde(default)]
    pub classification_marker: Option<String>,
}

fn default_polarity_threshold() -> f64 {
    -0.3
}

fn default_classifier_enabled() -> bool {
    true
}

fn default_marker() -> String {
    DEFAULT_ESCALATION_MARKER.to_string()
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            polarity_threshold: default_polarity_threshold(),
            classifier_enabled: default_classifier_enabled(),
            marker: default_marker(),
            classification_marker: None,
        }
    }
}

impl EscalationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(-1.0..=1.0).contains(&self.polarity_threshold) {
            anyhow::bail!(
                "polarity_threshold must be within [-1, 1], got {}",
                self.polarity_threshold
            );
        }
        if self.marker.trim().is_empty() {
            anyhow::bail!("escalation marker cannot be empty");
        }
        if let Some(ref marker) = self.classification_marker {
            if marker.trim().is_empty() {
                anyhow::bail!("classification_marker cannot be empty when set");
            }
        }
        Ok(())
    }

    /// Text that replaces the document for an escalation `reason`
    pub fn marker_for(&self, reason: EscalationReason) -> &str {
        match (reason, &self.classification_marker) {
            (EscalationReason::NegativeClassification, Some(marker)) => marker,
            _ => &self.marker,
        }
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("DOCVEIL_ESCALATION_POLARITY_THRESHOLD") {
            self.polarity_threshold = val
                .parse()
                .context("Invalid DOCVEIL_ESCALATION_POLARITY_THRESHOLD value")?;
        }

        if let Ok(val) = std::env::var("DOCVEIL_ESCALATION_CLASSIFIER_ENABLED") {
            self.classifier_enabled = val
                .parse()
                .context("Invalid DOCVEIL_ESCALATION_CLASSIFIER_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("DOCVEIL_ESCALATION_CLASSIFICATION_MARKER") {
            self.classification_marker = Some(val);
        }

        Ok(())
    }
}

/// `[detector]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Path to a pattern library TOML file, built-in patterns when unset
    pub pattern_library: Option<PathBuf>,

    /// Minimum pattern confidence
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
}

fn default_confidence_threshold() -> f32 {
    0.5
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            pattern_library: None,
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                anyhow::bail!("Pattern library file not found: {}", path.display());
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                anyhow::bail!("Pattern library must be a TOML file: {}", path.display());
            }
        }

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            anyhow::bail!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            );
        }

        Ok(())
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("DOCVEIL_DETECTOR_PATTERN_LIBRARY") {
            self.pattern_library = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("DOCVEIL_DETECTOR_CONFIDENCE_THRESHOLD") {
            self.confidence_threshold = val
                .parse()
                .context("Invalid DOCVEIL_DETECTOR_CONFIDENCE_THRESHOLD value")?;
        }

        Ok(())
    }
}

/// `[audit]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable the audit trail
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON lines instead of plain text
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/redaction.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}

impl AuditConfig {
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            anyhow::bail!("audit.log_path cannot be empty when the audit trail is enabled");
        }
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("DOCVEIL_AUDIT_ENABLED") {
            self.enabled = val.parse().context("Invalid DOCVEIL_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("DOCVEIL_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("DOCVEIL_AUDIT_JSON_FORMAT") {
            self.json_format = val
                .parse()
                .context("Invalid DOCVEIL_AUDIT_JSON_FORMAT value")?;
        }

        Ok(())
    }
}
