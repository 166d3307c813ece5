//! Preview command implementation
//!
//! Runs a document through upload, seal and open, then prints the text the
//! engine would see.

use crate::config::load_or_default;
use crate::session::{ExtractorRegistry, RedactionSession};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the preview command
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Document to preview
    pub file: PathBuf,

    /// Also print the sealed token
    #[arg(long)]
    pub token: bool,
}

impl PreviewArgs {
    /// Execute the preview command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(e.exit_code());
            }
        };

        let bytes = match tokio::fs::read(&self.file).await {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("❌ Cannot read {}: {e}", self.file.display());
                return Ok(3);
            }
        };

        let name = self.file.to_string_lossy().into_owned();
        let session = match RedactionSession::upload(
            name,
            &bytes,
            &config.document,
            &ExtractorRegistry::builtin(),
        ) {
            Ok(session) => session,
            Err(e) => {
                crate::log_error_with_context!(&e, "Upload failed");
                eprintln!("❌ {e}");
                return Ok(e.exit_code());
            }
        };

        eprintln!(
            "🔒 {} sealed ({} bytes, {} format)",
            session.name(),
            session.sealed().len(),
            session.format()
        );
        if self.token {
            eprintln!("   Token: {}", session.sealed().to_token());
        }

        match session.preview() {
            Ok(text) => {
                println!("{text}");
                Ok(0)
            }
            Err(e) => {
                eprintln!("❌ {e}");
                Ok(e.exit_code())
            }
        }
    }
}
