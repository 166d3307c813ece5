//! Redaction sessions
//!
//! A session owns one uploaded document for its lifetime: the extracted text
//! is sealed at upload and only opened again for preview or redaction.
//! Dropping the session drops the key, after which the content cannot be
//! recovered.
//!
//! ```no_run
//! use docveil::config::DocumentConfig;
//! use docveil::redaction::{Capabilities, RedactionConfig, RedactionEngine};
//! use docveil::session::{ExtractorRegistry, OutputFormat, RedactionSession};
//!
//! # fn example() -> anyhow::Result<()> {
//! let session = RedactionSession::upload(
//!     "memo.txt",
//!     b"John Smith works at Acme Corp.",
//!     &DocumentConfig::default(),
//!     &ExtractorRegistry::new(),
//! )?;
//! let engine = RedactionEngine::new(RedactionConfig::default(), Capabilities::builtin()?)?;
//! let result = session.redact(&engine, 2, false)?;
//! let download = session.export(&result, OutputFormat::Original)?;
//! std::fs::write(&download.file_name, &download.bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod decode;
pub mod extract;
pub mod formats;
pub mod store;

pub use decode::{decode_text, FallbackEncoding};
pub use extract::{
    DocumentEncoder, DocumentFormat, EncodedDocument, ExtractorRegistry, OutputFormat,
    TextExtractor,
};
pub use store::{open, seal, KeyHandle, SealedDocument};

use crate::config::DocumentConfig;
use crate::domain::{DocveilError, Result};
use crate::redaction::{RedactedText, RedactionEngine};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Base name of every download
const DOWNLOAD_STEM: &str = "redacted_document";

/// File ready to be written or served
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Download {
    /// Whether the download is UTF-8 text rather than a binary document
    pub fn is_plain_text(&self) -> bool {
        self.file_name.ends_with(".txt")
    }
}

/// One uploaded document and its session-scoped key
#[derive(Debug)]
pub struct RedactionSession {
    id: Uuid,
    name: String,
    format: DocumentFormat,
    uploaded_at: DateTime<Utc>,
    text_bytes: usize,
    sealed: SealedDocument,
    key: KeyHandle,
    registry: ExtractorRegistry,
}

impl RedactionSession {
    /// Extract and seal an uploaded document
    ///
    /// # Errors
    ///
    /// - [`DocveilError::UnsupportedFormat`] for an unknown extension, a
    ///   format without extractor, or an upload over the size limit
    /// - [`DocveilError::Decode`] when plain text cannot be decoded
    pub fn upload(
        name: impl Into<String>,
        bytes: &[u8],
        config: &DocumentConfig,
        registry: &ExtractorRegistry,
    ) -> Result<Self> {
        let name = name.into();

        if bytes.len() as u64 > config.max_upload_bytes {
            return Err(DocveilError::UnsupportedFormat(format!(
                "{} is {} bytes, over the {} byte upload limit",
                name,
                bytes.len(),
                config.max_upload_bytes
            )));
        }

        let format = DocumentFormat::from_path(&name)?;
        let text = registry.extract(format, bytes, config.fallback_encoding)?;
        let (sealed, key) = seal(text.as_bytes())?;

        let session = Self {
            id: Uuid::new_v4(),
            name,
            format,
            uploaded_at: Utc::now(),
            text_bytes: text.len(),
            sealed,
            key,
            registry: registry.clone(),
        };

        tracing::info!(
            session_id = %session.id,
            format = %session.format,
            text_bytes = session.text_bytes,
            "Document uploaded"
        );

        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    /// Length of the extracted text in bytes
    pub fn text_len(&self) -> usize {
        self.text_bytes
    }

    /// Sealed content, for display as a token
    pub fn sealed(&self) -> &SealedDocument {
        &self.sealed
    }

    /// Decrypted document text
    pub fn preview(&self) -> Result<String> {
        let bytes = open(&self.sealed, &self.key)?;
        String::from_utf8(bytes)
            .map_err(|e| DocveilError::Decode(format!("sealed text is not UTF-8: {e}")))
    }

    /// Decrypt the document and run the engine on it
    pub fn redact(
        &self,
        engine: &RedactionEngine,
        level: i64,
        use_synthetic: bool,
    ) -> Result<RedactedText> {
        let text = self.preview()?;
        let result = engine.redact(&text, level, use_synthetic)?;

        tracing::info!(
            session_id = %self.id,
            run_id = %result.run_id,
            decision = %result.decision,
            "Session redaction finished"
        );

        Ok(result)
    }

    /// Encode a result for download as `redacted_document.<ext>`
    pub fn export(&self, result: &RedactedText, output: OutputFormat) -> Result<Download> {
        let encoded = self.registry.encode(&result.text, output, self.format)?;
        Ok(Download {
            file_name: format!("{DOWNLOAD_STEM}.{}", encoded.extension),
            bytes: encoded.bytes,
        })
    }
}
