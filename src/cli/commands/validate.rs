//! Validate config command implementation
//!
//! This module implements the `validate-config` command. Unlike the other
//! commands, a missing configuration file is an error here.

use crate::config::load_config;
use crate::redaction::{categories_for, Capabilities};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        if let Err(e) = Capabilities::from_config(&config.detector) {
            println!("❌ Pattern library could not be loaded");
            println!("   Error: {e:#}");
            return Ok(2);
        }

        let redaction = &config.redaction;
        let active: Vec<&str> = categories_for(redaction.default_level)
            .iter()
            .map(|c| c.label())
            .collect();

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Default Level: {}", redaction.default_level);
        println!("  Active Categories: {}", active.join(", "));
        println!("  Synthetic Values: {}", redaction.use_synthetic);
        println!("  Out-of-range Levels: {}", redaction.out_of_range_levels);
        println!("  Reconciliation: {}", redaction.reconciliation);
        println!(
            "  Escalation Threshold: {}",
            redaction.escalation.polarity_threshold
        );
        println!(
            "  Classifier Enabled: {}",
            redaction.escalation.classifier_enabled
        );
        match &config.detector.pattern_library {
            Some(path) => println!("  Pattern Library: {}", path.display()),
            None => println!("  Pattern Library: built-in"),
        }
        println!("  Fallback Encoding: {}", config.document.fallback_encoding);
        println!("  Max Upload: {} bytes", config.document.max_upload_bytes);
        if config.audit.enabled {
            println!("  Audit Trail: {}", config.audit.log_path.display());
        } else {
            println!("  Audit Trail: disabled");
        }
        println!();

        Ok(0)
    }
}
