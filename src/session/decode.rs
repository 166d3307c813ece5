//! Decoding policy for uploaded bytes

use crate::domain::{DocveilError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Encoding tried when the bytes are not valid UTF-8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FallbackEncoding {
    /// ISO-8859-1, every byte maps to the code point of the same value
    #[default]
    Latin1,
    /// UTF-8 only
    None,
}

impl fmt::Display for FallbackEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latin1 => write!(f, "latin1"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Decode uploaded bytes as UTF-8, falling back to `fallback`
///
/// A leading UTF-8 byte order mark is dropped. The Latin-1 fallback refuses
/// input containing NUL bytes, which indicates binary content rather than
/// legacy text.
pub fn decode_text(bytes: &[u8], fallback: FallbackEncoding) -> Result<String> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let utf8_error = match std::str::from_utf8(bytes) {
        Ok(text) => return Ok(text.to_string()),
        Err(e) => e,
    };

    match fallback {
        FallbackEncoding::Latin1 => {
            if let Some(position) = bytes.iter().position(|&b| b == 0) {
                return Err(DocveilError::Decode(format!(
                    "not UTF-8 ({utf8_error}) and not Latin-1 text: NUL byte at offset {position}"
                )));
            }
            tracing::debug!(
                valid_up_to = utf8_error.valid_up_to(),
                "Input is not UTF-8, decoded as Latin-1"
            );
            Ok(bytes.iter().map(|&b| char::from(b)).collect())
        }
        FallbackEncoding::None => Err(DocveilError::Decode(format!(
            "not valid UTF-8: {utf8_error}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8() {
        let text = decode_text("Zoë in Köln".as_bytes(), FallbackEncoding::None).unwrap();
        assert_eq!(text, "Zoë in Köln");
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"hello");
        assert_eq!(decode_text(&bytes, FallbackEncoding::Latin1).unwrap(), "hello");
    }

    #[test]
    fn test_latin1_fallback() {
        // "Café" in ISO-8859-1
        let bytes = [0x43, 0x61, 0x66, 0xE9];
        assert_eq!(decode_text(&bytes, FallbackEncoding::Latin1).unwrap(), "Café");
    }

    #[test]
    fn test_disabled_fallback_fails() {
        let bytes = [0x43, 0x61, 0x66, 0xE9];
        assert!(matches!(
            decode_text(&bytes, FallbackEncoding::None),
            Err(DocveilError::Decode(_))
        ));
    }

    #[test]
    fn test_binary_content_is_rejected() {
        let bytes = [0x89, 0x50, 0x4E, 0x47, 0x00, 0x1A];
        let err = decode_text(&bytes, FallbackEncoding::Latin1).unwrap_err();
        assert!(err.to_string().contains("NUL byte at offset 4"));
    }

    #[test]
    fn test_fallback_serde() {
        #[derive(Deserialize)]
        struct Wrapper {
            encoding: FallbackEncoding,
        }
        let w: Wrapper = toml::from_str("encoding = \"none\"").unwrap();
        assert_eq!(w.encoding, FallbackEncoding::None);
        let w: Wrapper = toml::from_str("encoding = \"latin1\"").unwrap();
        assert_eq!(w.encoding, FallbackEncoding::Latin1);
    }
}
