//! Redact command implementation
//!
//! Loads the document into a session, runs the engine on a blocking thread,
//! and writes or prints the result.

use crate::config::{load_or_default, DocveilConfig};
use crate::domain::DocveilError;
use crate::redaction::audit::AuditLogger;
use crate::redaction::capabilities::{self, Capabilities};
use crate::redaction::render::{render_html, render_inline};
use crate::redaction::{RedactedText, RedactionEngine, RedactionReport};
use crate::session::{Download, ExtractorRegistry, OutputFormat, RedactionSession};
use anyhow::Context;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Download format selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Same format as the input when possible
    Original,
    /// Fixed-layout PDF of the redacted text
    Pdf,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Original => OutputFormat::Original,
            FormatArg::Pdf => OutputFormat::Pdf,
        }
    }
}

/// How detected entities are shown after the redacted text
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnnotationStyle {
    Html,
    Inline,
    None,
}

/// Arguments for the redact command
#[derive(Args, Debug)]
pub struct RedactArgs {
    /// Document to redact (.txt, .docx, .pdf, .xlsx)
    pub file: PathBuf,

    /// Redaction level (1-5), defaults to redaction.default_level
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub level: Option<i64>,

    /// Replace entities with synthetic values instead of placeholders
    #[arg(short, long)]
    pub synthetic: bool,

    /// Write the redacted document here; without it text is printed and
    /// binary documents are written to `redacted_document.<ext>`
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Download format
    #[arg(short, long, value_enum, default_value = "original")]
    pub format: FormatArg,

    /// Show detected entities of the original document
    #[arg(short, long, value_enum, default_value = "none")]
    pub annotations: AnnotationStyle,

    /// Print a redaction report
    #[arg(short, long)]
    pub report: bool,
}

/// Everything the blocking redaction hands back to the command
struct RunOutput {
    original: String,
    result: RedactedText,
    download: Download,
}

impl RedactArgs {
    /// Execute the redact command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(
            config_path = %config_path,
            file = %self.file.display(),
            "Starting redaction"
        );

        let config = match load_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(e.exit_code());
            }
        };

        let engine = match build_engine(&config) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("❌ Failed to initialize redaction engine");
                eprintln!("   Error: {e:#}");
                return Ok(2);
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
        let level = self.level.unwrap_or(config.redaction.default_level);
        let use_synthetic = self.synthetic || config.redaction.use_synthetic;
        let output_format = OutputFormat::from(self.format);
        let document_config = config.document.clone();

        let run = tokio::task::spawn_blocking(move || -> Result<RunOutput, DocveilError> {
            let session = RedactionSession::upload(
                name,
                &bytes,
                &document_config,
                &ExtractorRegistry::builtin(),
            )?;
            let original = session.preview()?;
            let result = session.redact(&engine, level, use_synthetic)?;
            let download = session.export(&result, output_format)?;
            Ok(RunOutput {
                original,
                result,
                download,
            })
        })
        .await
        .context("Redaction task panicked")?;

        let run = match run {
            Ok(run) => run,
            Err(e) => {
                crate::log_error_with_context!(&e, "Redaction failed");
                eprintln!("❌ Redaction failed");
                eprintln!("   Error: {e}");
                return Ok(e.exit_code());
            }
        };

        match &self.output {
            Some(path) => {
                tokio::fs::write(path, &run.download.bytes)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("✅ Redacted document written to {}", path.display());
            }
            None if run.download.is_plain_text() => println!("{}", run.result.text),
            None => {
                tokio::fs::write(&run.download.file_name, &run.download.bytes)
                    .await
                    .with_context(|| format!("Failed to write {}", run.download.file_name))?;
                eprintln!("✅ Redacted document written to {}", run.download.file_name);
            }
        }

        match self.annotations {
            AnnotationStyle::Html => {
                println!("{}", render_html(&run.original, &run.result.annotations))
            }
            AnnotationStyle::Inline => {
                println!("{}", render_inline(&run.original, &run.result.annotations))
            }
            AnnotationStyle::None => {}
        }

        if self.report {
            let document = self.file.display().to_string();
            let report = RedactionReport::from_result(document, &run.result);
            println!("{}", report.format_console());
        }

        Ok(0)
    }
}

/// Engine over the shared capability registry
///
/// The first call installs capabilities built from `[detector]`; later calls
/// reuse whatever is installed without building anything.
pub fn build_engine(config: &DocveilConfig) -> anyhow::Result<RedactionEngine> {
    let shared = capabilities::get_or_install(|| Capabilities::from_config(&config.detector))?;

    let engine = RedactionEngine::new(config.redaction.clone(), shared.clone())?;
    match AuditLogger::from_config(&config.audit)? {
        Some(logger) => Ok(engine.with_audit_logger(logger)),
        None => Ok(engine),
    }
}
