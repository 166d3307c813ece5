//! Entity detection module
//!
//! Provides the trait-based detection interface consumed by the engine and a
//! rule-based implementation backed by a regex pattern library. Model-based
//! detectors plug in by implementing [`EntityDetector`].

pub mod patterns;
pub mod regex;

use crate::redaction::models::EntitySpan;
use anyhow::Result;

/// Trait for entity detection implementations
///
/// Implementations return spans with byte offsets into `text`. Spans from a
/// single call must not overlap.
pub trait EntityDetector: Send + Sync {
    /// Detect entities in a text
    fn detect(&self, text: &str) -> Result<Vec<EntitySpan>>;

    /// Short name used in logs and error messages
    fn name(&self) -> &'static str;
}
