//! Redaction run reporting
//!
//! Summarizes one redaction run for the console or as JSON: what was found,
//! which pass won, and a few sample replacements. Original entity text never
//! appears in a report; samples carry a short hash prefix instead.

use crate::redaction::audit::logger::hash_value;
use crate::redaction::models::{Decision, EntityCategory, RedactedText, SentimentLabel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MAX_SAMPLES: usize = 10;
const HASH_PREFIX_LEN: usize = 12;

/// Report for a single redaction run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionReport {
    /// Source document name
    pub document: String,

    /// Requested level
    pub level: i64,

    /// Whether synthetic values were requested
    pub use_synthetic: bool,

    /// Final outcome
    pub decision: Decision,

    /// Polarity of the intermediate text
    pub polarity: f64,

    /// Classifier label, when consulted
    pub label: Option<SentimentLabel>,

    /// Entities found in the original text
    pub entities_detected: usize,

    /// Entities whose category was active at the level
    pub entities_in_scope: usize,

    /// Replacements in the final text, by category
    pub replacements_by_category: BTreeMap<EntityCategory, usize>,

    /// Sample replacements
    pub samples: Vec<ReplacementSample>,

    /// Processing time (ms)
    pub processing_time_ms: u64,
}

/// One replacement, with the original reduced to a hash prefix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplacementSample {
    pub category: EntityCategory,
    pub original_hash: String,
    pub replacement: String,
}

impl RedactionReport {
    /// Build a report from a run result
    pub fn from_result(document: impl Into<String>, result: &RedactedText) -> Self {
        let samples = result
            .decisions
            .iter()
            .take(MAX_SAMPLES)
            .map(|d| ReplacementSample {
                category: d.span.category,
                original_hash: hash_value(&d.span.text)[..HASH_PREFIX_LEN].to_string(),
                replacement: d.replacement.clone(),
            })
            .collect();

        Self {
            document: document.into(),
            level: result.level,
            use_synthetic: result.use_synthetic,
            decision: result.decision,
            polarity: result.sentiment.polarity,
            label: result.sentiment.label,
            entities_detected: result.annotations.len(),
            entities_in_scope: result.annotations.iter().filter(|a| a.redacted).count(),
            replacements_by_category: result.stats_by_category.clone(),
            samples,
            processing_time_ms: result.processing_time_ms,
        }
    }

    /// Total replacements in the final text
    pub fn total_replacements(&self) -> usize {
        self.replacements_by_category.values().sum()
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let rule = "───────────────────────────────────────────────────────────────\n";
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                       REDACTION REPORT                        \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str(rule);
        output.push_str(&format!("  Document:             {}\n", self.document));
        output.push_str(&format!("  Level:                {}\n", self.level));
        output.push_str(&format!("  Synthetic values:     {}\n", self.use_synthetic));
        output.push_str(&format!("  Decision:             {}\n", self.decision));
        output.push_str(&format!("  Polarity:             {:.3}\n", self.polarity));
        if let Some(label) = self.label {
            output.push_str(&format!("  Classifier label:     {}\n", label));
        }
        output.push_str(&format!("  Entities detected:    {}\n", self.entities_detected));
        output.push_str(&format!("  Entities in scope:    {}\n", self.entities_in_scope));
        output.push_str(&format!("  Replacements:         {}\n", self.total_replacements()));
        output.push_str(&format!("  Processing time:      {} ms\n", self.processing_time_ms));
        output.push('\n');

        if !self.replacements_by_category.is_empty() {
            output.push_str("🔍 REPLACEMENTS BY CATEGORY\n");
            output.push_str(rule);

            let mut categories: Vec<_> = self.replacements_by_category.iter().collect();
            categories.sort_by(|a, b| b.1.cmp(a.1));

            for (category, count) in categories {
                output.push_str(&format!("  {:30} {:>5}\n", category.label(), count));
            }
            output.push('\n');
        }

        if !self.samples.is_empty() {
            output.push_str("📝 SAMPLE REPLACEMENTS\n");
            output.push_str(rule);

            for (i, sample) in self.samples.iter().enumerate() {
                output.push_str(&format!("\n  Sample #{}\n", i + 1));
                output.push_str(&format!("    Category:     {}\n", sample.category));
                output.push_str(&format!("    Original:     sha256:{}…\n", sample.original_hash));
                output.push_str(&format!("    Replacement:  \"{}\"\n", sample.replacement));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the JSON report to a file
    pub fn write_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.format_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redaction::models::{
        Annotation, EntitySpan, ReplacementDecision, ReplacementReason, SentimentReading,
    };
    use chrono::Utc;
    use uuid::Uuid;

    fn result_with(decisions: Vec<ReplacementDecision>) -> RedactedText {
        let annotations = decisions
            .iter()
            .map(|d| Annotation::from_span(&d.span, true))
            .collect();
        RedactedText {
            run_id: Uuid::new_v4(),
            text: String::new(),
            decision: Decision::SecondaryPass,
            primary_text: String::new(),
            level: 3,
            use_synthetic: false,
            active_categories: vec![EntityCategory::Person],
            stats_by_category: RedactedText::count_by_category(&decisions),
            decisions,
            annotations,
            sentiment: SentimentReading {
                polarity: 0.25,
                label: Some(SentimentLabel::Neutral),
            },
            processing_time_ms: 8,
            timestamp: Utc::now(),
        }
    }

    fn person(start: usize) -> ReplacementDecision {
        ReplacementDecision::new(
            EntitySpan::new(EntityCategory::Person, "John Smith", start, start + 10),
            "<PERSON>".to_string(),
            ReplacementReason::SecondaryPass,
        )
    }

    #[test]
    fn test_report_from_result() {
        let report = RedactionReport::from_result("memo.txt", &result_with(vec![person(0)]));

        assert_eq!(report.document, "memo.txt");
        assert_eq!(report.total_replacements(), 1);
        assert_eq!(report.entities_detected, 1);
        assert_eq!(report.samples.len(), 1);
        assert_eq!(report.samples[0].original_hash.len(), HASH_PREFIX_LEN);
    }

    #[test]
    fn test_samples_are_capped() {
        let decisions = (0..25).map(|i| person(i * 20)).collect();
        let report = RedactionReport::from_result("memo.txt", &result_with(decisions));
        assert_eq!(report.samples.len(), MAX_SAMPLES);
        assert_eq!(report.total_replacements(), 25);
    }

    #[test]
    fn test_outputs_never_contain_original_text() {
        let report = RedactionReport::from_result("memo.txt", &result_with(vec![person(0)]));

        let console = report.format_console();
        assert!(console.contains("REDACTION REPORT"));
        assert!(console.contains("Decision:             secondary_pass"));
        assert!(!console.contains("John Smith"));

        let json = report.format_json().unwrap();
        assert!(!json.contains("John Smith"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["decision"]["outcome"], "secondary_pass");
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = RedactionReport::from_result("memo.txt", &result_with(Vec::new()));
        report.write_to_file(&path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("memo.txt"));
    }
}
