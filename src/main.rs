// Docveil - Document Redaction Tool
// Copyright (c) 2025 Docveil Contributors
// Licensed under the MIT License

use clap::Parser;
use docveil::cli::Cli;
use docveil::config::{load_or_default, LoggingConfig};
use docveil::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Commands report configuration errors themselves; logging falls back to
    // console-only output until then
    let (config_level, logging_config) = match load_or_default(&cli.config) {
        Ok(config) => (config.application.log_level, config.logging),
        Err(_) => ("info".to_string(), LoggingConfig::default()),
    };
    let log_level = cli.log_level.clone().unwrap_or(config_level);

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(e.exit_code());
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "docveil starting");

    let exit_code = match cli.execute().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e:#}");
            5
        }
    };

    // process::exit skips destructors, flush file logs first
    drop(guard);
    process::exit(exit_code);
}
