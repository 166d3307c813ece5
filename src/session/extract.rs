//! Text extraction and output encoding collaborators
//!
//! Plain text is handled natively. Paragraph, page and spreadsheet formats
//! need a registered [`TextExtractor`]; fixed-layout output needs a registered
//! [`DocumentEncoder`]. [`ExtractorRegistry::builtin`] registers the readers
//! and the PDF writer from [`crate::session::formats`].

use crate::domain::{DocveilError, Result};
use crate::session::decode::{decode_text, FallbackEncoding};
use crate::session::formats::{DocxExtractor, PdfEncoder, PdfExtractor, XlsxExtractor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Uploaded document format, from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Txt,
    Docx,
    Pdf,
    Xlsx,
}

impl DocumentFormat {
    /// Detect the format of `name` (case-insensitive extension)
    pub fn from_path(name: impl AsRef<Path>) -> Result<Self> {
        let name = name.as_ref();
        let extension = name
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| {
                DocveilError::UnsupportedFormat(format!(
                    "{} has no file extension",
                    name.display()
                ))
            })?;

        match extension.as_str() {
            "txt" => Ok(Self::Txt),
            "docx" => Ok(Self::Docx),
            "pdf" => Ok(Self::Pdf),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(DocveilError::UnsupportedFormat(format!(
                ".{other} (supported: txt, docx, pdf, xlsx)"
            ))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Docx => "docx",
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Requested download format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Same format as the upload when it can be encoded, plain text otherwise
    #[default]
    Original,
    /// Minimal fixed-layout document
    Pdf,
}

/// Flattens a document format into a single text string
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> anyhow::Result<String>;

    /// Short name used in logs and error messages
    fn name(&self) -> &'static str;
}

/// Encodes redacted text into a downloadable document
pub trait DocumentEncoder: Send + Sync {
    fn encode(&self, text: &str) -> anyhow::Result<Vec<u8>>;

    /// Short name used in logs and error messages
    fn name(&self) -> &'static str;
}

/// Encoded download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDocument {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
}

/// Registered extractors and encoders, keyed by format
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<DocumentFormat, Arc<dyn TextExtractor>>,
    encoders: HashMap<DocumentFormat, Arc<dyn DocumentEncoder>>,
}

impl ExtractorRegistry {
    /// Registry that only handles plain text
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the DOCX, PDF and XLSX readers and the PDF writer
    pub fn builtin() -> Self {
        Self::new()
            .with_extractor(DocumentFormat::Docx, Arc::new(DocxExtractor))
            .with_extractor(DocumentFormat::Pdf, Arc::new(PdfExtractor))
            .with_extractor(DocumentFormat::Xlsx, Arc::new(XlsxExtractor))
            .with_encoder(DocumentFormat::Pdf, Arc::new(PdfEncoder::default()))
    }

    pub fn with_extractor(mut self, format: DocumentFormat, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractors.insert(format, extractor);
        self
    }

    pub fn with_encoder(mut self, format: DocumentFormat, encoder: Arc<dyn DocumentEncoder>) -> Self {
        self.encoders.insert(format, encoder);
        self
    }

    /// Whether uploads of `format` can be read
    pub fn supports(&self, format: DocumentFormat) -> bool {
        format == DocumentFormat::Txt || self.extractors.contains_key(&format)
    }

    /// Extract the text of an upload
    ///
    /// # Errors
    ///
    /// - [`DocveilError::UnsupportedFormat`] when no extractor is registered
    /// - [`DocveilError::Decode`] when plain text cannot be decoded
    /// - [`DocveilError::CapabilityFailure`] when the extractor fails
    pub fn extract(
        &self,
        format: DocumentFormat,
        bytes: &[u8],
        fallback: FallbackEncoding,
    ) -> Result<String> {
        if format == DocumentFormat::Txt {
            return decode_text(bytes, fallback);
        }

        let extractor = self.extractors.get(&format).ok_or_else(|| {
            DocveilError::UnsupportedFormat(format!("no text extractor registered for .{format}"))
        })?;

        extractor
            .extract(bytes)
            .map_err(|e| DocveilError::capability(extractor.name(), e))
    }

    /// Encode redacted text for download
    ///
    /// `Original` keeps the upload's format when it is plain text or an
    /// encoder is registered for it, and falls back to UTF-8 text otherwise.
    /// `Pdf` requires a registered PDF encoder.
    pub fn encode(
        &self,
        text: &str,
        output: OutputFormat,
        original: DocumentFormat,
    ) -> Result<EncodedDocument> {
        let target = match output {
            OutputFormat::Original => original,
            OutputFormat::Pdf => DocumentFormat::Pdf,
        };

        if target == DocumentFormat::Txt {
            return Ok(plain_text(text));
        }

        match (self.encoders.get(&target), output) {
            (Some(encoder), _) => {
                let bytes = encoder
                    .encode(text)
                    .map_err(|e| DocveilError::capability(encoder.name(), e))?;
                Ok(EncodedDocument {
                    bytes,
                    extension: target.extension(),
                })
            }
            (None, OutputFormat::Original) => {
                tracing::warn!(format = %target, "No encoder registered, writing plain text");
                Ok(plain_text(text))
            }
            (None, OutputFormat::Pdf) => Err(DocveilError::UnsupportedFormat(
                "no PDF encoder registered".to_string(),
            )),
        }
    }
}

impl fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("extractors", &sorted_extensions(self.extractors.keys()))
            .field("encoders", &sorted_extensions(self.encoders.keys()))
            .finish()
    }
}

fn sorted_extensions<'a>(formats: impl Iterator<Item = &'a DocumentFormat>) -> Vec<&'static str> {
    let mut extensions: Vec<_> = formats.map(|format| format.extension()).collect();
    extensions.sort_unstable();
    extensions
}

fn plain_text(text: &str) -> EncodedDocument {
    EncodedDocument {
        bytes: text.as_bytes().to_vec(),
        extension: DocumentFormat::Txt.extension(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    struct UpperExtractor;

    impl TextExtractor for UpperExtractor {
        fn extract(&self, bytes: &[u8]) -> anyhow::Result<String> {
            Ok(String::from_utf8_lossy(bytes).to_uppercase())
        }

        fn name(&self) -> &'static str {
            "upper_extractor"
        }
    }

    struct BrokenExtractor;

    impl TextExtractor for BrokenExtractor {
        fn extract(&self, _bytes: &[u8]) -> anyhow::Result<String> {
            anyhow::bail!("corrupt archive")
        }

        fn name(&self) -> &'static str {
            "broken_extractor"
        }
    }

    struct TaggedEncoder;

    impl DocumentEncoder for TaggedEncoder {
        fn encode(&self, text: &str) -> anyhow::Result<Vec<u8>> {
            Ok(format!("%PDF {text}").into_bytes())
        }

        fn name(&self) -> &'static str {
            "tagged_encoder"
        }
    }

    #[test_case("notes.txt", DocumentFormat::Txt ; "txt")]
    #[test_case("Report.DOCX", DocumentFormat::Docx ; "uppercase docx")]
    #[test_case("/tmp/scan.pdf", DocumentFormat::Pdf ; "pdf path")]
    #[test_case("ledger.xlsx", DocumentFormat::Xlsx ; "xlsx")]
    fn test_format_detection(name: &str, expected: DocumentFormat) {
        assert_eq!(DocumentFormat::from_path(name).unwrap(), expected);
    }

    #[test_case("image.png" ; "unknown extension")]
    #[test_case("README" ; "no extension")]
    fn test_unsupported_formats(name: &str) {
        assert!(matches!(
            DocumentFormat::from_path(name),
            Err(DocveilError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_txt_is_native() {
        let registry = ExtractorRegistry::new();
        assert!(registry.supports(DocumentFormat::Txt));
        let text = registry
            .extract(DocumentFormat::Txt, b"plain", FallbackEncoding::Latin1)
            .unwrap();
        assert_eq!(text, "plain");
    }

    #[test]
    fn test_missing_extractor() {
        let registry = ExtractorRegistry::new();
        assert!(!registry.supports(DocumentFormat::Docx));
        assert!(matches!(
            registry.extract(DocumentFormat::Docx, b"PK", FallbackEncoding::Latin1),
            Err(DocveilError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_registered_extractor() {
        let registry =
            ExtractorRegistry::new().with_extractor(DocumentFormat::Docx, Arc::new(UpperExtractor));
        let text = registry
            .extract(DocumentFormat::Docx, b"memo", FallbackEncoding::None)
            .unwrap();
        assert_eq!(text, "MEMO");
    }

    #[test]
    fn test_extractor_failure() {
        let registry =
            ExtractorRegistry::new().with_extractor(DocumentFormat::Pdf, Arc::new(BrokenExtractor));
        let err = registry
            .extract(DocumentFormat::Pdf, b"%PDF", FallbackEncoding::Latin1)
            .unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_encode_original_falls_back_to_text() {
        let registry = ExtractorRegistry::new();
        let encoded = registry
            .encode("redacted", OutputFormat::Original, DocumentFormat::Docx)
            .unwrap();
        assert_eq!(encoded.extension, "txt");
        assert_eq!(encoded.bytes, b"redacted");
    }

    #[test]
    fn test_builtin_registry() {
        let registry = ExtractorRegistry::builtin();
        for format in [
            DocumentFormat::Txt,
            DocumentFormat::Docx,
            DocumentFormat::Pdf,
            DocumentFormat::Xlsx,
        ] {
            assert!(registry.supports(format), "{format} unsupported");
        }

        let encoded = registry
            .encode("redacted", OutputFormat::Pdf, DocumentFormat::Txt)
            .unwrap();
        assert_eq!(encoded.extension, "pdf");
        assert!(encoded.bytes.starts_with(b"%PDF"));

        // No DOCX writer, so the original format still falls back to text
        let encoded = registry
            .encode("redacted", OutputFormat::Original, DocumentFormat::Docx)
            .unwrap();
        assert_eq!(encoded.extension, "txt");
    }

    #[test]
    fn test_encode_pdf() {
        let registry = ExtractorRegistry::new();
        assert!(matches!(
            registry.encode("x", OutputFormat::Pdf, DocumentFormat::Txt),
            Err(DocveilError::UnsupportedFormat(_))
        ));

        let registry =
            ExtractorRegistry::new().with_encoder(DocumentFormat::Pdf, Arc::new(TaggedEncoder));
        let encoded = registry
            .encode("x", OutputFormat::Pdf, DocumentFormat::Txt)
            .unwrap();
        assert_eq!(encoded.extension, "pdf");
        assert_eq!(encoded.bytes, b"%PDF x");
    }
}
