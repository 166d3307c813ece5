//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for docveil using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// docveil - document redaction with sentiment escalation
#[derive(Parser, Debug)]
#[command(name = "docveil")]
#[command(version, about, long_about = None)]
#[command(author = "Docveil Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "docveil.toml", env = "DOCVEIL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "DOCVEIL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Redact a document
    Redact(commands::redact::RedactArgs),

    /// Decode, seal and print a document without redacting it
    Preview(commands::preview::PreviewArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Run the selected command, returning the process exit code
    pub async fn execute(&self) -> anyhow::Result<i32> {
        match &self.command {
            Commands::Redact(args) => args.execute(&self.config).await,
            Commands::Preview(args) => args.execute(&self.config).await,
            Commands::ValidateConfig(args) => args.execute(&self.config).await,
            Commands::Init(args) => args.execute().await,
        }
    }
}
