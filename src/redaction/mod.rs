//! Redaction decision pipeline
//!
//! Turns raw document text into a single, offset-correct redacted text by
//! combining entity detection, a tiered level policy, placeholder or synthetic
//! substitution, sentiment escalation and a secondary anonymization pass.
//!
//! # Architecture
//!
//! - **Policy**: fixed level-to-category table
//! - **Capabilities**: detector, scorer, classifier, generator and secondary
//!   anonymizer behind traits, shared through a process-wide registry
//! - **Engine**: offset-indexed rewrite, escalation and reconciliation
//! - **Audit**: append-only trail with hashed entity values
//!
//! # Usage
//!
//! ```rust,ignore
//! use docveil::redaction::{capabilities, RedactionConfig, RedactionEngine};
//!
//! let caps = capabilities::global()?.clone();
//! let engine = RedactionEngine::new(RedactionConfig::default(), caps)?;
//! let result = engine.redact(&text, 3, false)?;
//! ```

pub mod audit;
pub mod capabilities;
pub mod config;
pub mod detector;
pub mod engine;
pub mod models;
pub mod placeholder;
pub mod policy;
pub mod render;
pub mod report;
pub mod rewrite;
pub mod secondary;
pub mod sentiment;
pub mod synthetic;

pub use capabilities::Capabilities;
pub use config::{AuditConfig, DetectorConfig, EscalationConfig, RedactionConfig, ReconciliationPolicy};
pub use engine::{reconcile, RedactionEngine};
pub use models::{Decision, EntityCategory, EntitySpan, RedactedText};
pub use policy::{categories_for, OutOfRangeLevel, RedactionLevel};
pub use report::RedactionReport;
