//! Domain error types
//!
//! This module defines the error hierarchy for docveil. Every fallible public
//! operation returns [`DocveilError`]; third-party error types are flattened into
//! messages so callers can show a user-facing explanation without depending on
//! the crates underneath.

use thiserror::Error;

/// Main docveil error type
#[derive(Debug, Error)]
pub enum DocveilError {
    /// The uploaded file format has no registered extractor or encoder
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// No viable text encoding could decode the uploaded bytes
    #[error("Decode error: {0}")]
    Decode(String),

    /// An external capability (detector, scorer, classifier, generator,
    /// anonymizer) failed
    #[error("Capability '{capability}' failed: {message}")]
    CapabilityFailure {
        /// Name of the capability that failed
        capability: &'static str,
        /// Error chain reported by the capability
        message: String,
    },

    /// Redaction level outside the supported 1-5 range
    #[error("Invalid redaction level {0}: must be between 1 and 5")]
    InvalidLevel(i64),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Sealing or opening a session document failed
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DocveilError {
    /// Wrap an `anyhow` error raised by a named capability
    ///
    /// The full context chain is kept in the message so that the CLI can show
    /// where the capability broke.
    pub fn capability(capability: &'static str, error: anyhow::Error) -> Self {
        Self::CapabilityFailure {
            capability,
            message: format!("{error:#}"),
        }
    }

    /// Process exit code used by the CLI for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::InvalidLevel(_) => 2,
            Self::UnsupportedFormat(_) | Self::Decode(_) => 3,
            Self::CapabilityFailure { .. } => 4,
            Self::Encryption(_) | Self::Io(_) | Self::Serialization(_) => 5,
        }
    }
}

impl From<std::io::Error> for DocveilError {
    fn from(err: std::io::Error) -> Self {
        DocveilError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DocveilError {
    fn from(err: serde_json::Error) -> Self {
        DocveilError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for DocveilError {
    fn from(err: toml::de::Error) -> Self {
        DocveilError::Configuration(format!("Failed to parse TOML: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_error_display() {
        let err = DocveilError::InvalidLevel(7);
        assert_eq!(
            err.to_string(),
            "Invalid redaction level 7: must be between 1 and 5"
        );

        let err = DocveilError::Decode("not utf-8".to_string());
        assert_eq!(err.to_string(), "Decode error: not utf-8");
    }

    #[test]
    fn test_capability_keeps_context_chain() {
        let inner: anyhow::Result<()> = Err(anyhow::anyhow!("model not loaded"));
        let err = inner.context("scoring intermediate text").unwrap_err();

        let err = DocveilError::capability("sentiment_scorer", err);
        let message = err.to_string();
        assert!(message.contains("sentiment_scorer"));
        assert!(message.contains("scoring intermediate text"));
        assert!(message.contains("model not loaded"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(DocveilError::Configuration("x".into()).exit_code(), 2);
        assert_eq!(DocveilError::Decode("x".into()).exit_code(), 3);
        assert_eq!(
            DocveilError::CapabilityFailure {
                capability: "entity_detector",
                message: "x".into()
            }
            .exit_code(),
            4
        );
        assert_eq!(DocveilError::Encryption("x".into()).exit_code(), 5);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.txt");
        let err: DocveilError = io_err.into();
        assert!(matches!(err, DocveilError::Io(_)));
    }
}
