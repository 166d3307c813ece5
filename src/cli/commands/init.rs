//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "docveil.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing docveil configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Validate configuration: docveil validate-config");
                println!("  3. Redact a document: docveil redact memo.txt --level 3");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Sample configuration with every setting at its default
    fn sample_config() -> String {
        r#"# docveil configuration
# Values may reference environment variables as ${VAR_NAME}.
# Any setting can also be overridden with DOCVEIL_<SECTION>_<KEY>.

[application]
# trace | debug | info | warn | error
log_level = "info"

# ============================================================================
# Redaction
# ============================================================================
[redaction]
# Level used when --level is not given
#   1: PERSON
#   2: + ORG
#   3: + GPE, LOC
#   4: + DATE, MONEY, CARDINAL
#   5: + ID, EMAIL, PHONE
default_level = 3

# Replace entities with realistic fake values instead of [PLACEHOLDERS]
use_synthetic = false

# Levels outside 1-5: "degrade" redacts nothing, "reject" fails the run
out_of_range_levels = "degrade"

# Final text: "secondary_overrides" uses the <LABEL> anonymization of the
# original text, "primary_only" keeps the level-based rewrite
reconciliation = "secondary_overrides"

[redaction.escalation]
# Whole document is withheld when polarity is below this value
polarity_threshold = -0.3

# Also withhold when the categorical classifier says negative
classifier_enabled = true

marker = "[REDACTED DUE TO SENSITIVE SENTIMENT]"

# Separate marker for classifier escalations (defaults to `marker`)
# classification_marker = "[REDACTED DUE TO NEGATIVE CLASSIFICATION]"

# ============================================================================
# Entity detection
# ============================================================================
[detector]
# Custom pattern library (built-in patterns when unset)
# pattern_library = "patterns/entity_patterns.toml"
confidence_threshold = 0.5

# ============================================================================
# Uploaded documents
# ============================================================================
[document]
# Tried when a .txt file is not UTF-8: "latin1" or "none"
fallback_encoding = "latin1"
max_upload_bytes = 10485760

# ============================================================================
# Audit trail (hashes only, never entity text)
# ============================================================================
[audit]
enabled = false
log_path = "./audit/redaction.log"
json_format = true

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "./logs"
# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocveilConfig;

    #[test]
    fn test_sample_config_parses_and_validates() {
        let config: DocveilConfig = toml::from_str(&InitArgs::sample_config()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.redaction.default_level, 3);
        assert!(config.detector.pattern_library.is_none());
    }

    #[tokio::test]
    async fn test_init_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("docveil.toml");

        let args = InitArgs {
            output: output.to_string_lossy().into_owned(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&output).unwrap().contains("[redaction]"));

        // Refuses to overwrite without --force
        assert_eq!(args.execute().await.unwrap(), 2);

        let args = InitArgs {
            force: true,
            ..args
        };
        assert_eq!(args.execute().await.unwrap(), 0);
    }
}
