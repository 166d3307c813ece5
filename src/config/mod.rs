//! Configuration management for docveil.
//!
//! TOML configuration with:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `DOCVEIL_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation per section
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use docveil::config::load_or_default;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_or_default("docveil.toml")?;
//! println!("Default level: {}", config.redaction.default_level);
//! println!("Reconciliation: {}", config.redaction.reconciliation);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`RedactionConfig`] - default level, synthetic values, level policy,
//!   reconciliation and sentiment escalation
//! - [`DetectorConfig`] - pattern library and confidence threshold
//! - [`DocumentConfig`] - decoding fallback and upload limit
//! - [`AuditConfig`] - redaction audit trail
//! - [`LoggingConfig`] - JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [redaction]
//! default_level = 3
//! reconciliation = "secondary_overrides"
//!
//! [redaction.escalation]
//! polarity_threshold = -0.3
//! marker = "${DOCVEIL_MARKER}"
//!
//! [document]
//! fallback_encoding = "latin1"
//! ```

pub mod loader;
pub mod schema;

pub use crate::redaction::{AuditConfig, DetectorConfig, EscalationConfig, RedactionConfig};
pub use loader::{load_config, load_or_default};
pub use schema::{ApplicationConfig, DocumentConfig, DocveilConfig, LoggingConfig};
