//! Placeholder resolution
//!
//! Chooses the replacement text for a redacted span: either a fixed bracketed
//! placeholder for its category or a synthetic value from the generator.

use crate::domain::{DocveilError, Result};
use crate::redaction::models::EntityCategory;
use crate::redaction::synthetic::SyntheticGenerator;
use std::sync::Arc;

/// Placeholder for categories without a dedicated one
pub const GENERIC_PLACEHOLDER: &str = "[REDACTED]";

/// Generator attempts before falling back to the fixed placeholder
const MAX_SYNTHETIC_ATTEMPTS: usize = 3;

/// Fixed placeholder for a category
pub fn placeholder_for(category: EntityCategory) -> &'static str {
    match category {
        EntityCategory::Person => "[NAME]",
        EntityCategory::Org => "[ORGANIZATION]",
        EntityCategory::Gpe | EntityCategory::Loc => "[LOCATION]",
        EntityCategory::Date => "[DATE]",
        EntityCategory::Money => "[AMOUNT]",
        EntityCategory::Cardinal => "[NUMBER]",
        _ => GENERIC_PLACEHOLDER,
    }
}

/// Resolves replacement text for redacted spans
#[derive(Clone)]
pub struct PlaceholderResolver {
    generator: Arc<dyn SyntheticGenerator>,
}

impl PlaceholderResolver {
    /// Create a resolver around a synthetic generator
    pub fn new(generator: Arc<dyn SyntheticGenerator>) -> Self {
        Self { generator }
    }

    /// Replacement for one span
    ///
    /// With `use_synthetic` the generator is asked for a value; a value equal to
    /// the original text is never returned. After a few identical attempts the
    /// fixed placeholder is used instead.
    ///
    /// # Errors
    ///
    /// Returns [`DocveilError::CapabilityFailure`] if the generator fails.
    pub fn resolve(
        &self,
        category: EntityCategory,
        original: &str,
        use_synthetic: bool,
    ) -> Result<String> {
        if !use_synthetic {
            return Ok(placeholder_for(category).to_string());
        }

        for _ in 0..MAX_SYNTHETIC_ATTEMPTS {
            let value = self
                .generator
                .generate(category)
                .map_err(|e| DocveilError::capability(self.generator.name(), e))?;

            if value.trim() != original.trim() && !value.trim().is_empty() {
                return Ok(value);
            }
        }

        tracing::debug!(
            category = %category,
            "Synthetic generator kept returning the original value, using placeholder"
        );
        Ok(placeholder_for(category).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redaction::synthetic::FakeGenerator;

    struct EchoGenerator(&'static str);

    impl SyntheticGenerator for EchoGenerator {
        fn generate(&self, _category: EntityCategory) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &'static str {
            "echo"
        }
    }

    struct BrokenGenerator;

    impl SyntheticGenerator for BrokenGenerator {
        fn generate(&self, _category: EntityCategory) -> anyhow::Result<String> {
            anyhow::bail!("faker offline")
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    #[test]
    fn test_fixed_placeholders() {
        assert_eq!(placeholder_for(EntityCategory::Person), "[NAME]");
        assert_eq!(placeholder_for(EntityCategory::Org), "[ORGANIZATION]");
        assert_eq!(placeholder_for(EntityCategory::Gpe), "[LOCATION]");
        assert_eq!(placeholder_for(EntityCategory::Loc), "[LOCATION]");
        assert_eq!(placeholder_for(EntityCategory::Date), "[DATE]");
        assert_eq!(placeholder_for(EntityCategory::Money), "[AMOUNT]");
        assert_eq!(placeholder_for(EntityCategory::Cardinal), "[NUMBER]");
        assert_eq!(placeholder_for(EntityCategory::Email), "[REDACTED]");
    }

    #[test]
    fn test_resolve_without_synthetic_ignores_generator() {
        let resolver = PlaceholderResolver::new(Arc::new(BrokenGenerator));
        let value = resolver
            .resolve(EntityCategory::Person, "John Smith", false)
            .unwrap();
        assert_eq!(value, "[NAME]");
    }

    #[test]
    fn test_resolve_synthetic_person() {
        let resolver = PlaceholderResolver::new(Arc::new(FakeGenerator::seeded(1)));
        let value = resolver
            .resolve(EntityCategory::Person, "John Smith", true)
            .unwrap();
        assert_ne!(value, "John Smith");
        assert!(!value.starts_with('['));
    }

    #[test]
    fn test_resolve_never_returns_original() {
        let resolver = PlaceholderResolver::new(Arc::new(EchoGenerator("Paris")));
        let value = resolver.resolve(EntityCategory::Gpe, "Paris", true).unwrap();
        assert_eq!(value, "[LOCATION]");
    }

    #[test]
    fn test_generator_failure_is_reported() {
        let resolver = PlaceholderResolver::new(Arc::new(BrokenGenerator));
        let err = resolver
            .resolve(EntityCategory::Person, "John Smith", true)
            .unwrap_err();
        match err {
            DocveilError::CapabilityFailure { capability, message } => {
                assert_eq!(capability, "broken");
                assert!(message.contains("faker offline"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
