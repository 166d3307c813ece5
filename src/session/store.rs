//! Session document store
//!
//! Uploaded text is held encrypted for the lifetime of a session. Every seal
//! uses a fresh XChaCha20-Poly1305 key that lives only inside a [`KeyHandle`];
//! the handle cannot be cloned, serialized or printed, and its key bytes are
//! zeroed when it is dropped.

use crate::domain::{DocveilError, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{DebugSecret, ExposeSecret, Secret};
use std::fmt;
use zeroize::Zeroize;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 24;

/// Associated data binding ciphertexts to this format version
const AAD: &[u8] = b"docveil-session-v1";

/// Leading byte of an encoded token
const TOKEN_VERSION: u8 = 1;

#[derive(Zeroize)]
struct KeyMaterial([u8; KEY_LEN]);

impl DebugSecret for KeyMaterial {}

/// Session-scoped key for one sealed document
pub struct KeyHandle {
    key: Secret<KeyMaterial>,
}

impl KeyHandle {
    fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        let key = Secret::new(KeyMaterial(bytes));
        bytes.zeroize();
        Self { key }
    }

    fn cipher(&self) -> XChaCha20Poly1305 {
        XChaCha20Poly1305::new(Key::from_slice(&self.key.expose_secret().0))
    }
}

impl fmt::Debug for KeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyHandle([REDACTED])")
    }
}

/// Encrypted document content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedDocument {
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
    sealed_at: DateTime<Utc>,
}

impl SealedDocument {
    pub fn sealed_at(&self) -> DateTime<Utc> {
        self.sealed_at
    }

    /// Ciphertext length in bytes, including the authentication tag
    pub fn len(&self) -> usize {
        self.ciphertext.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ciphertext.is_empty()
    }

    /// URL-safe base64 token: version byte, seal time, nonce, ciphertext
    pub fn to_token(&self) -> String {
        let mut raw = Vec::with_capacity(1 + 8 + NONCE_LEN + self.ciphertext.len());
        raw.push(TOKEN_VERSION);
        raw.extend_from_slice(&self.sealed_at.timestamp().to_be_bytes());
        raw.extend_from_slice(&self.nonce);
        raw.extend_from_slice(&self.ciphertext);
        URL_SAFE_NO_PAD.encode(raw)
    }

    /// Parse a token produced by [`to_token`](Self::to_token)
    pub fn from_token(token: &str) -> Result<Self> {
        let raw = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|e| DocveilError::Encryption(format!("Malformed token: {e}")))?;

        let (&version, rest) = raw
            .split_first()
            .ok_or_else(|| DocveilError::Encryption("Empty token".to_string()))?;
        if version != TOKEN_VERSION {
            return Err(DocveilError::Encryption(format!(
                "Unsupported token version {version}"
            )));
        }
        if rest.len() < 8 + NONCE_LEN {
            return Err(DocveilError::Encryption("Token is truncated".to_string()));
        }

        let (timestamp, rest) = rest.split_at(8);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        let mut seconds = [0u8; 8];
        seconds.copy_from_slice(timestamp);
        let sealed_at = DateTime::from_timestamp(i64::from_be_bytes(seconds), 0)
            .ok_or_else(|| DocveilError::Encryption("Token timestamp out of range".to_string()))?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        nonce_bytes.copy_from_slice(nonce);

        Ok(Self {
            nonce: nonce_bytes,
            ciphertext: ciphertext.to_vec(),
            sealed_at,
        })
    }
}

/// Encrypt `plaintext` under a fresh key
pub fn seal(plaintext: &[u8]) -> Result<(SealedDocument, KeyHandle)> {
    let key = KeyHandle::generate();

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = key
        .cipher()
        .encrypt(
            XNonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: AAD,
            },
        )
        .map_err(|_| DocveilError::Encryption("Failed to seal document".to_string()))?;

    tracing::debug!(bytes = plaintext.len(), "Document sealed");

    let sealed = SealedDocument {
        nonce,
        ciphertext,
        sealed_at: Utc::now(),
    };
    Ok((sealed, key))
}

/// Decrypt a sealed document with its key
///
/// # Errors
///
/// Returns [`DocveilError::Encryption`] for a wrong key or tampered content.
pub fn open(sealed: &SealedDocument, key: &KeyHandle) -> Result<Vec<u8>> {
    key.cipher()
        .decrypt(
            XNonce::from_slice(&sealed.nonce),
            Payload {
                msg: &sealed.ciphertext,
                aad: AAD,
            },
        )
        .map_err(|_| {
            DocveilError::Encryption(
                "Failed to open document: wrong key or tampered content".to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let text = "John Smith works at Acme Corp in Paris on 2024-01-01.";
        let (sealed, key) = seal(text.as_bytes()).unwrap();
        assert_ne!(sealed.ciphertext, text.as_bytes());
        assert_eq!(open(&sealed, &key).unwrap(), text.as_bytes());
    }

    #[test]
    fn test_round_trip_binary_and_empty() {
        let bytes: Vec<u8> = (0..=255u8).collect();
        let (sealed, key) = seal(&bytes).unwrap();
        assert_eq!(open(&sealed, &key).unwrap(), bytes);

        let (sealed, key) = seal(b"").unwrap();
        assert!(open(&sealed, &key).unwrap().is_empty());
    }

    #[test]
    fn test_each_seal_uses_a_fresh_key() {
        let (first, first_key) = seal(b"same text").unwrap();
        let (second, second_key) = seal(b"same text").unwrap();

        assert_ne!(first.ciphertext, second.ciphertext);
        assert!(open(&first, &second_key).is_err());
        assert!(open(&second, &first_key).is_err());
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let (mut sealed, key) = seal(b"do not touch").unwrap();
        sealed.ciphertext[0] ^= 0x01;
        assert!(matches!(
            open(&sealed, &key),
            Err(DocveilError::Encryption(_))
        ));
    }

    #[test]
    fn test_key_debug_is_redacted() {
        let (_, key) = seal(b"secret").unwrap();
        assert_eq!(format!("{key:?}"), "KeyHandle([REDACTED])");
    }

    #[test]
    fn test_token_round_trip() {
        let (sealed, key) = seal("Zoë in Köln".as_bytes()).unwrap();
        let token = sealed.to_token();
        assert!(!token.contains('='));

        let parsed = SealedDocument::from_token(&token).unwrap();
        assert_eq!(parsed.ciphertext, sealed.ciphertext);
        assert_eq!(parsed.sealed_at.timestamp(), sealed.sealed_at.timestamp());
        assert_eq!(open(&parsed, &key).unwrap(), "Zoë in Köln".as_bytes());
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(SealedDocument::from_token("not base64 !!").is_err());
        assert!(SealedDocument::from_token("").is_err());
        assert!(SealedDocument::from_token(&URL_SAFE_NO_PAD.encode([2u8; 40])).is_err());
        assert!(SealedDocument::from_token(&URL_SAFE_NO_PAD.encode([1u8; 10])).is_err());
    }
}
