//! Secondary anonymization pass
//!
//! An independent analyzer runs over the original text and the anonymizer
//! rewrites every span it found with a `<LABEL>` tag. The engine decides
//! whether this output replaces the primary rewrite.

use crate::redaction::models::{EntityCategory, EntitySpan};
use crate::redaction::rewrite;
use anyhow::{anyhow, Result};

/// Trait for secondary anonymizers
pub trait SecondaryAnonymizer: Send + Sync {
    /// Rewrite `text`, replacing every span in `spans`
    fn anonymize(&self, text: &str, spans: &[EntitySpan]) -> Result<String>;

    /// Text written in place of a span of `category`
    fn replacement_for(&self, category: EntityCategory) -> String {
        format!("<{}>", category.label())
    }

    /// Short name used in logs and error messages
    fn name(&self) -> &'static str;
}

/// Replaces spans with angle-bracketed entity type tags
#[derive(Debug, Clone, Copy, Default)]
pub struct TagAnonymizer;

impl TagAnonymizer {
    pub fn new() -> Self {
        Self
    }

    /// Tag written in place of a span of `category`
    pub fn tag_for(category: EntityCategory) -> &'static str {
        match category {
            EntityCategory::Person => "<PERSON>",
            EntityCategory::Org => "<ORGANIZATION>",
            EntityCategory::Gpe | EntityCategory::Loc => "<LOCATION>",
            EntityCategory::Date => "<DATE_TIME>",
            EntityCategory::Money => "<MONEY>",
            EntityCategory::Cardinal => "<NUMBER>",
            EntityCategory::Id => "<ID>",
            EntityCategory::Email => "<EMAIL_ADDRESS>",
            EntityCategory::Phone => "<PHONE_NUMBER>",
        }
    }
}

impl SecondaryAnonymizer for TagAnonymizer {
    fn anonymize(&self, text: &str, spans: &[EntitySpan]) -> Result<String> {
        let spans = rewrite::resolve_overlaps(spans);
        rewrite::apply(
            text,
            spans.iter().map(|span| (span, Self::tag_for(span.category))),
        )
        .map_err(|message| anyhow!(message))
    }

    fn replacement_for(&self, category: EntityCategory) -> String {
        Self::tag_for(category).to_string()
    }

    fn name(&self) -> &'static str {
        "tag_anonymizer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_every_span() {
        let text = "Mail ann@example.com or call Ann";
        let spans = vec![
            EntitySpan::new(EntityCategory::Email, "ann@example.com", 5, 20),
            EntitySpan::new(EntityCategory::Person, "Ann", 29, 32),
        ];
        let output = TagAnonymizer::new().anonymize(text, &spans).unwrap();
        assert_eq!(output, "Mail <EMAIL_ADDRESS> or call <PERSON>");
    }

    #[test]
    fn test_overlapping_spans_are_resolved() {
        let text = "John Smith Corp";
        let spans = vec![
            EntitySpan::new(EntityCategory::Org, "Smith Corp", 5, 15),
            EntitySpan::new(EntityCategory::Person, "John Smith", 0, 10),
        ];
        let output = TagAnonymizer::new().anonymize(text, &spans).unwrap();
        assert_eq!(output, "<PERSON> Corp");
    }

    #[test]
    fn test_invalid_span_is_an_error() {
        let spans = vec![EntitySpan::new(EntityCategory::Person, "x", 4, 90)];
        assert!(TagAnonymizer::new().anonymize("tiny", &spans).is_err());
    }

    #[test]
    fn test_no_spans_keeps_text() {
        assert_eq!(TagAnonymizer::new().anonymize("plain", &[]).unwrap(), "plain");
    }
}
