// ============================================
// File: crates/nutkit-core/src/crypto/keys.rs
// ============================================
//! # Nut Key Types
//!
//! ## Creation Reason
//! A nut service is configured once with one symmetric key and one cipher
//! suite. This module holds those two values with the security properties
//! they need (zeroize on drop, no key bytes in `Debug`).
//!
//! ## Main Functionality
//! - `CipherSuite`: Supported AEAD constructions and their key sizes
//! - `NutKey`: The symmetric key, with base64 import/export
//!
//! ## ⚠️ Important Note for Next Developer
//! - Key bytes should NEVER be logged
//! - Key length is checked against the suite when the codec is built
//!
//! ## Last Modified
//! v0.1.0 - Initial key type definitions

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::rngs::OsRng;
use rand::RngCore;
use nutkit_common::error::CommonError;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{KEY_SIZE_128, KEY_SIZE_256};
use crate::error::{CoreError, Result};

// ============================================
// CipherSuite
// ============================================

/// AEAD construction used to seal nuts.
///
/// Every suite uses a 96-bit nonce and a 128-bit tag, so the transport
/// layout is identical across suites; only the key size differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CipherSuite {
    /// ChaCha20-Poly1305 with a 256-bit key.
    #[default]
    #[serde(rename = "chacha20-poly1305")]
    ChaCha20Poly1305,
    /// AES-GCM with a 128-bit key.
    #[serde(rename = "aes-128-gcm")]
    Aes128Gcm,
    /// AES-GCM with a 256-bit key.
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
}

impl CipherSuite {
    /// All supported suites.
    pub const ALL: [Self; 3] = [Self::ChaCha20Poly1305, Self::Aes128Gcm, Self::Aes256Gcm];

    /// Required key length in bytes.
    #[must_use]
    pub const fn key_len(&self) -> usize {
        match self {
            Self::ChaCha20Poly1305 | Self::Aes256Gcm => KEY_SIZE_256,
            Self::Aes128Gcm => KEY_SIZE_128,
        }
    }

    /// Configuration name of the suite.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ChaCha20Poly1305 => "chacha20-poly1305",
            Self::Aes128Gcm => "aes-128-gcm",
            Self::Aes256Gcm => "aes-256-gcm",
        }
    }
}

impl fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CipherSuite {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|suite| suite.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::configuration(format!("unknown cipher suite '{s}'")))
    }
}

// ============================================
// NutKey
// ============================================

/// Symmetric key used to seal and open nuts.
///
/// # Security
/// - Key bytes are zeroed on drop
/// - `Debug` prints only the length
///
/// # Example
/// ```
/// use nutkit_core::crypto::{CipherSuite, NutKey};
///
/// let key = NutKey::generate(CipherSuite::Aes128Gcm).unwrap();
/// assert_eq!(key.len(), 16);
///
/// let restored = NutKey::from_base64(&key.to_base64()).unwrap();
/// assert_eq!(restored.as_bytes(), key.as_bytes());
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct NutKey {
    bytes: Vec<u8>,
}

impl NutKey {
    /// Generates a fresh random key sized for `suite`.
    ///
    /// # Errors
    /// Returns `RandomSourceFailure` if the OS generator is unavailable.
    pub fn generate(suite: CipherSuite) -> Result<Self> {
        let mut bytes = vec![0u8; suite.key_len()];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CoreError::random_source(e.to_string()))?;
        Ok(Self { bytes })
    }

    /// Creates a key from raw bytes.
    ///
    /// The length is not checked here; the codec rejects keys that do not
    /// fit the chosen suite.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Decodes a key from standard base64.
    ///
    /// # Errors
    /// Returns `Common(Decoding)` if the text is not valid base64.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(CommonError::from)?;
        Ok(Self { bytes })
    }

    /// Encodes the key as standard base64 for storage.
    ///
    /// # Security Warning
    /// The returned string is the secret key.
    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the key length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the key has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for NutKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material
        f.debug_struct("NutKey")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_key_lengths() {
        assert_eq!(CipherSuite::ChaCha20Poly1305.key_len(), 32);
        assert_eq!(CipherSuite::Aes128Gcm.key_len(), 16);
        assert_eq!(CipherSuite::Aes256Gcm.key_len(), 32);
    }

    #[test]
    fn test_suite_names_parse_back() {
        for suite in CipherSuite::ALL {
            let parsed: CipherSuite = suite.name().parse().unwrap();
            assert_eq!(parsed, suite);
        }
        assert!("AES-128-GCM".parse::<CipherSuite>().is_ok());
        assert!(matches!(
            "des".parse::<CipherSuite>(),
            Err(CoreError::Configuration { .. })
        ));
    }

    #[test]
    fn test_suite_default_is_chacha() {
        assert_eq!(CipherSuite::default(), CipherSuite::ChaCha20Poly1305);
    }

    #[test]
    fn test_generate_key_sizes() {
        for suite in CipherSuite::ALL {
            let key = NutKey::generate(suite).unwrap();
            assert_eq!(key.len(), suite.key_len());
        }
    }

    #[test]
    fn test_generated_keys_differ() {
        let a = NutKey::generate(CipherSuite::ChaCha20Poly1305).unwrap();
        let b = NutKey::generate(CipherSuite::ChaCha20Poly1305).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_base64_roundtrip() {
        let key = NutKey::from_bytes(&[0x42u8; 32]);
        let restored = NutKey::from_base64(&key.to_base64()).unwrap();
        assert_eq!(restored.as_bytes(), key.as_bytes());
    }

    #[test]
    fn test_invalid_base64_rejected() {
        assert!(matches!(
            NutKey::from_base64("***"),
            Err(CoreError::Common(CommonError::Decoding { .. }))
        ));
        assert!(NutKey::from_base64("***").unwrap_err().is_fatal());
    }

    #[test]
    fn test_debug_hides_key() {
        let key = NutKey::from_bytes(&[0xABu8; 16]);
        let debug = format!("{key:?}");
        assert_eq!(debug, "NutKey { len: 16, .. }");
    }
}
