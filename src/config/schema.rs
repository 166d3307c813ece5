//! Configuration schema types
//!
//! Every section has defaults, so an empty file (or no file at all) yields a
//! working configuration.

use crate::redaction::{AuditConfig, DetectorConfig, RedactionConfig};
use crate::session::FallbackEncoding;
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Root configuration, mapped from `docveil.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocveilConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Level policy, reconciliation and escalation
    #[serde(default)]
    pub redaction: RedactionConfig,

    /// Built-in pattern detector
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Upload decoding and limits
    #[serde(default)]
    pub document: DocumentConfig,

    /// Redaction audit trail
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DocveilConfig {
    /// Validates every section
    ///
    /// # Errors
    ///
    /// Returns the first invalid section with its context chain
    pub fn validate(&self) -> anyhow::Result<()> {
        self.application
            .validate()
            .map_err(anyhow::Error::msg)
            .context("Invalid [application] section")?;
        self.redaction
            .validate()
            .context("Invalid [redaction] section")?;
        self.detector
            .validate()
            .context("Invalid [detector] section")?;
        self.document
            .validate()
            .map_err(anyhow::Error::msg)
            .context("Invalid [document] section")?;
        self.audit.validate().context("Invalid [audit] section")?;
        self.logging
            .validate()
            .map_err(anyhow::Error::msg)
            .context("Invalid [logging] section")?;
        Ok(())
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Upload handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Encoding tried when plain text is not UTF-8
    #[serde(default)]
    pub fallback_encoding: FallbackEncoding,

    /// Largest accepted upload, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            fallback_encoding: FallbackEncoding::default(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl DocumentConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_upload_bytes == 0 {
            return Err("document.max_upload_bytes must be > 0".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable the JSON log file
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_upload_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
