//! Data models for the redaction pipeline

pub mod entity;
pub mod outcome;

pub use entity::{Annotation, EntityCategory, EntitySpan, ReplacementDecision, ReplacementReason};
pub use outcome::{Decision, EscalationReason, RedactedText, SentimentLabel, SentimentReading};
