//! Audit logger for redaction runs

use crate::redaction::config::AuditConfig;
use crate::redaction::models::{RedactedText, ReplacementDecision};
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    run_id: String,
    level: i64,
    use_synthetic: bool,
    decision: String,
    replacements_count: usize,
    processing_time_ms: u64,
    replacements: Vec<AuditReplacement>,
}

/// Audit replacement entry (with hashed entity text)
#[derive(Debug, Serialize)]
struct AuditReplacement {
    category: String,
    reason: String,
    start: usize,
    end: usize,
    /// SHA-256 hash of the original span text, plaintext is never written
    value_hash: String,
}

/// Appends one line per redaction run to the audit file
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    write_lock: Mutex<()>,
}

impl AuditLogger {
    /// Create a new audit logger, creating the parent directory if needed
    pub fn new(log_path: PathBuf, json_format: bool) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create audit log directory: {}", parent.display())
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            write_lock: Mutex::new(()),
        })
    }

    /// Logger for the `[audit]` section, `None` when disabled
    pub fn from_config(config: &AuditConfig) -> Result<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }
        Self::new(config.log_path.clone(), config.json_format).map(Some)
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log a completed redaction run
    pub fn log_redaction(&self, result: &RedactedText) -> Result<()> {
        let entry = AuditLogEntry {
            timestamp: result.timestamp.to_rfc3339(),
            run_id: result.run_id.to_string(),
            level: result.level,
            use_synthetic: result.use_synthetic,
            decision: result.decision.to_string(),
            replacements_count: result.decisions.len(),
            processing_time_ms: result.processing_time_ms,
            replacements: result
                .decisions
                .iter()
                .map(|d| self.create_audit_replacement(d))
                .collect(),
        };

        self.write_entry(&entry)
    }

    fn create_audit_replacement(&self, decision: &ReplacementDecision) -> AuditReplacement {
        AuditReplacement {
            category: decision.span.category.to_string(),
            reason: format!("{:?}", decision.reason),
            start: decision.span.start,
            end: decision.span.end,
            value_hash: hash_value(&decision.span.text),
        }
    }

    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("audit log lock is poisoned"))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        if self.json_format {
            let json_line =
                serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        } else {
            writeln!(
                file,
                "[{}] Run: {} | Level: {} | Decision: {} | Replacements: {} | Time: {}ms",
                entry.timestamp,
                entry.run_id,
                entry.level,
                entry.decision,
                entry.replacements_count,
                entry.processing_time_ms
            )
            .context("Failed to write audit entry")?;
        }

        Ok(())
    }
}

/// Hex SHA-256 of an entity value
pub fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}
