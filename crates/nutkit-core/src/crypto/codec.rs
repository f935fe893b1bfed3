// ============================================
// File: crates/nutkit-core/src/crypto/codec.rs
// ============================================
//! # Nut Codec
//!
//! ## Creation Reason
//! Seals nut payloads into opaque, authenticated transport strings and
//! opens them again, using the configured AEAD suite.
//!
//! ## Main Functionality
//! - `NutCodec`: Owns the initialized cipher for the service lifetime
//! - `seal` / `open`: Raw 16-byte payload in, transport string out (and back)
//! - `encode` / `decode`: Same, on structured [`NutPayload`] values
//!
//! ## Transport Format
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ Nonce (12 bytes)              │ ← random per nut     │
//! ├──────────────────────────────────────────────────────┤
//! │ Ciphertext (16 bytes)         │ ← sealed payload     │
//! │ Tag (16 bytes)                │ ← authentication tag │
//! └──────────────────────────────────────────────────────┘
//! base64url, no padding: 44 bytes → 59 characters
//! ```
//!
//! ## Open Order
//! 1. base64 decode        → `MalformedEncoding`
//! 2. length > nonce       → `Truncated`
//! 3. verify tag + decrypt → `AuthenticationFailed`
//! 4. plaintext == 16      → `WrongPayloadSize`
//!
//! ## ⚠️ Important Note for Next Developer
//! - Never reuse a (key, nonce) pair - catastrophic security failure
//! - A random source failure aborts the seal; there is no fallback RNG
//! - No associated data is used
//!
//! ## Last Modified
//! v0.1.0 - Initial codec implementation

use std::fmt;

use aes_gcm::{Aes128Gcm, Aes256Gcm};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL, Engine};
use chacha20poly1305::aead::{consts::U12, Aead, AeadCore, KeyInit, Nonce};
use chacha20poly1305::ChaCha20Poly1305;
use rand::rngs::OsRng;
use rand::RngCore;

use nutkit_common::error::CommonError;
use nutkit_common::types::Nut;

use super::keys::{CipherSuite, NutKey};
use super::{AEAD_NONCE_SIZE, AEAD_TAG_SIZE};
use crate::error::{CoreError, Result};
use crate::nut::payload::{NutPayload, PAYLOAD_SIZE};

/// Length of a decoded nut: nonce, sealed payload and tag.
pub const SEALED_NUT_SIZE: usize = AEAD_NONCE_SIZE + PAYLOAD_SIZE + AEAD_TAG_SIZE;

// ============================================
// SuiteCipher
// ============================================

/// An initialized AEAD for one of the supported suites.
enum SuiteCipher {
    ChaCha20Poly1305(ChaCha20Poly1305),
    Aes128Gcm(Aes128Gcm),
    Aes256Gcm(Aes256Gcm),
}

impl SuiteCipher {
    fn new(suite: CipherSuite, key: &NutKey) -> Result<Self> {
        if key.len() != suite.key_len() {
            return Err(CommonError::invalid_length(suite.key_len(), key.len()).into());
        }

        let init_failed = |_| CoreError::configuration(format!("failed to initialize {suite}"));
        let cipher = match suite {
            CipherSuite::ChaCha20Poly1305 => Self::ChaCha20Poly1305(
                ChaCha20Poly1305::new_from_slice(key.as_bytes()).map_err(init_failed)?,
            ),
            CipherSuite::Aes128Gcm => {
                Self::Aes128Gcm(Aes128Gcm::new_from_slice(key.as_bytes()).map_err(init_failed)?)
            }
            CipherSuite::Aes256Gcm => {
                Self::Aes256Gcm(Aes256Gcm::new_from_slice(key.as_bytes()).map_err(init_failed)?)
            }
        };
        Ok(cipher)
    }

    fn seal(&self, nonce: &[u8; AEAD_NONCE_SIZE], plaintext: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::ChaCha20Poly1305(c) => seal_with(c, nonce, plaintext),
            Self::Aes128Gcm(c) => seal_with(c, nonce, plaintext),
            Self::Aes256Gcm(c) => seal_with(c, nonce, plaintext),
        }
    }

    fn open(&self, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::ChaCha20Poly1305(c) => open_with(c, nonce, ciphertext),
            Self::Aes128Gcm(c) => open_with(c, nonce, ciphertext),
            Self::Aes256Gcm(c) => open_with(c, nonce, ciphertext),
        }
    }
}

fn seal_with<A>(cipher: &A, nonce: &[u8; AEAD_NONCE_SIZE], plaintext: &[u8]) -> Result<Vec<u8>>
where
    A: Aead + AeadCore<NonceSize = U12>,
{
    cipher
        .encrypt(Nonce::<A>::from_slice(nonce), plaintext)
        .map_err(|_| CoreError::Encryption {
            context: "nut payload".into(),
        })
}

fn open_with<A>(cipher: &A, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>>
where
    A: Aead + AeadCore<NonceSize = U12>,
{
    // Caller guarantees nonce.len() == AEAD_NONCE_SIZE
    cipher
        .decrypt(Nonce::<A>::from_slice(nonce), ciphertext)
        .map_err(|_| CoreError::AuthenticationFailed)
}

// ============================================
// NutCodec
// ============================================

/// Seals and opens nuts under one fixed key.
///
/// The cipher is built once at construction and is read-only afterwards,
/// so a codec can be shared freely across threads.
///
/// # Example
/// ```
/// use nutkit_core::crypto::{CipherSuite, NutCodec, NutKey};
///
/// let key = NutKey::generate(CipherSuite::ChaCha20Poly1305).unwrap();
/// let codec = NutCodec::new(&key, CipherSuite::ChaCha20Poly1305).unwrap();
///
/// let nut = codec.seal(&[7u8; 16]).unwrap();
/// assert_eq!(codec.open(nut.as_str()).unwrap(), [7u8; 16]);
/// ```
pub struct NutCodec {
    suite: CipherSuite,
    cipher: SuiteCipher,
}

impl NutCodec {
    /// Builds a codec for `suite` from `key`.
    ///
    /// # Errors
    /// Returns `Common(InvalidLength)` if the key length does not fit the suite.
    /// Callers treat this as a fatal startup error.
    pub fn new(key: &NutKey, suite: CipherSuite) -> Result<Self> {
        let cipher = SuiteCipher::new(suite, key)?;
        Ok(Self { suite, cipher })
    }

    /// Returns the cipher suite in use.
    #[must_use]
    pub const fn suite(&self) -> CipherSuite {
        self.suite
    }

    /// Seals a raw payload into a transport string.
    ///
    /// # Errors
    /// - `RandomSourceFailure`: the OS generator could not supply a nonce
    /// - `Encryption`: the AEAD refused the input
    pub fn seal(&self, payload: &[u8; PAYLOAD_SIZE]) -> Result<Nut> {
        let mut nonce = [0u8; AEAD_NONCE_SIZE];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|e| CoreError::random_source(e.to_string()))?;

        let ciphertext = self.cipher.seal(&nonce, payload)?;

        let mut sealed = Vec::with_capacity(AEAD_NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);

        Ok(Nut::from(BASE64_URL.encode(sealed)))
    }

    /// Opens a transport string back into the raw payload.
    ///
    /// # Errors
    /// `MalformedEncoding`, `Truncated`, `AuthenticationFailed` or
    /// `WrongPayloadSize`, checked in that order.
    pub fn open(&self, encoded: &str) -> Result<[u8; PAYLOAD_SIZE]> {
        let sealed = BASE64_URL
            .decode(encoded)
            .map_err(|_| CoreError::MalformedEncoding)?;

        if sealed.len() <= AEAD_NONCE_SIZE {
            return Err(CoreError::truncated(AEAD_NONCE_SIZE, sealed.len()));
        }
        let (nonce, ciphertext) = sealed.split_at(AEAD_NONCE_SIZE);

        let plaintext = self.cipher.open(nonce, ciphertext)?;

        plaintext
            .as_slice()
            .try_into()
            .map_err(|_| CoreError::WrongPayloadSize {
                expected: PAYLOAD_SIZE,
                actual: plaintext.len(),
            })
    }

    /// Seals a structured payload.
    ///
    /// # Errors
    /// Same as [`Self::seal`].
    pub fn encode(&self, payload: &NutPayload) -> Result<Nut> {
        self.seal(&payload.to_bytes())
    }

    /// Opens a transport string into a structured payload.
    ///
    /// # Errors
    /// Same as [`Self::open`].
    pub fn decode(&self, encoded: &str) -> Result<NutPayload> {
        self.open(encoded).map(|bytes| NutPayload::from_bytes(&bytes))
    }
}

impl fmt::Debug for NutCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material
        f.debug_struct("NutCodec")
            .field("suite", &self.suite)
            .finish_non_exhaustive()
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_codec(suite: CipherSuite) -> NutCodec {
        let key = NutKey::from_bytes(&vec![0x42u8; suite.key_len()]);
        NutCodec::new(&key, suite).unwrap()
    }

    /// Decodes a nut, applies `f` to the raw bytes and re-encodes it.
    fn tamper(nut: &Nut, f: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut raw = BASE64_URL.decode(nut.as_str()).unwrap();
        f(&mut raw);
        BASE64_URL.encode(raw)
    }

    #[test]
    fn test_seal_open_roundtrip_all_suites() {
        let payload: [u8; PAYLOAD_SIZE] = core::array::from_fn(|i| i as u8);
        for suite in CipherSuite::ALL {
            let codec = test_codec(suite);
            let nut = codec.seal(&payload).unwrap();
            assert_eq!(codec.open(nut.as_str()).unwrap(), payload, "{suite}");
        }
    }

    #[test]
    fn test_sealed_length() {
        let codec = test_codec(CipherSuite::ChaCha20Poly1305);
        let nut = codec.seal(&[0u8; PAYLOAD_SIZE]).unwrap();
        let raw = BASE64_URL.decode(nut.as_str()).unwrap();
        assert_eq!(raw.len(), SEALED_NUT_SIZE);
        assert_eq!(nut.as_str().len(), 59);
    }

    #[test]
    fn test_transport_is_url_safe() {
        let codec = test_codec(CipherSuite::ChaCha20Poly1305);
        for _ in 0..64 {
            let nut = codec.seal(&[0xFFu8; PAYLOAD_SIZE]).unwrap();
            assert!(nut
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        }
    }

    #[test]
    fn test_same_payload_seals_differently() {
        let codec = test_codec(CipherSuite::Aes256Gcm);
        let a = codec.seal(&[1u8; PAYLOAD_SIZE]).unwrap();
        let b = codec.seal(&[1u8; PAYLOAD_SIZE]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_key_length_rejected() {
        let key = NutKey::from_bytes(&[0u8; 16]);
        assert!(matches!(
            NutCodec::new(&key, CipherSuite::ChaCha20Poly1305),
            Err(CoreError::Common(CommonError::InvalidLength {
                expected: 32,
                actual: 16
            }))
        ));
        assert!(matches!(
            NutCodec::new(&key, CipherSuite::Aes256Gcm),
            Err(CoreError::Common(CommonError::InvalidLength { .. }))
        ));
        assert!(NutCodec::new(&key, CipherSuite::Aes128Gcm).is_ok());

        let empty = NutKey::from_bytes(&[]);
        assert!(NutCodec::new(&empty, CipherSuite::Aes128Gcm).is_err());
    }

    #[test]
    fn test_malformed_encoding() {
        let codec = test_codec(CipherSuite::ChaCha20Poly1305);
        assert!(matches!(
            codec.open("not base64!!"),
            Err(CoreError::MalformedEncoding)
        ));
        // Standard alphabet characters are not accepted by the URL-safe engine
        assert!(matches!(
            codec.open("ab+/"),
            Err(CoreError::MalformedEncoding)
        ));
    }

    #[test]
    fn test_truncated() {
        let codec = test_codec(CipherSuite::ChaCha20Poly1305);
        assert!(matches!(
            codec.open(""),
            Err(CoreError::Truncated { min: 12, actual: 0 })
        ));

        let nonce_only = BASE64_URL.encode([0u8; AEAD_NONCE_SIZE]);
        assert!(matches!(
            codec.open(&nonce_only),
            Err(CoreError::Truncated { min: 12, actual: 12 })
        ));
    }

    #[test]
    fn test_short_ciphertext_fails_authentication() {
        let codec = test_codec(CipherSuite::ChaCha20Poly1305);
        let nut = codec.seal(&[0u8; PAYLOAD_SIZE]).unwrap();
        let cut = tamper(&nut, |raw| raw.truncate(AEAD_NONCE_SIZE + 5));
        assert!(matches!(
            codec.open(&cut),
            Err(CoreError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_tampered_nonce_fails() {
        let codec = test_codec(CipherSuite::ChaCha20Poly1305);
        let nut = codec.seal(&[0u8; PAYLOAD_SIZE]).unwrap();
        let bad = tamper(&nut, |raw| raw[0] ^= 0x01);
        assert!(matches!(
            codec.open(&bad),
            Err(CoreError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_every_single_bit_flip_rejected() {
        for suite in CipherSuite::ALL {
            let codec = test_codec(suite);
            let nut = codec.seal(&[0x5Au8; PAYLOAD_SIZE]).unwrap();

            for byte in AEAD_NONCE_SIZE..SEALED_NUT_SIZE {
                for bit in 0..8u32 {
                    let bad = tamper(&nut, |raw| raw[byte] ^= 1u8 << bit);
                    assert!(
                        matches!(codec.open(&bad), Err(CoreError::AuthenticationFailed)),
                        "{suite}: flip of byte {byte} bit {bit} was accepted"
                    );
                }
            }
        }
    }

    #[test]
    fn test_wrong_payload_size() {
        // A correctly sealed message of the wrong length must still be rejected
        let codec = test_codec(CipherSuite::ChaCha20Poly1305);
        let nonce = [9u8; AEAD_NONCE_SIZE];
        let ciphertext = codec.cipher.seal(&nonce, &[0u8; 20]).unwrap();
        let mut raw = nonce.to_vec();
        raw.extend_from_slice(&ciphertext);

        assert!(matches!(
            codec.open(&BASE64_URL.encode(raw)),
            Err(CoreError::WrongPayloadSize {
                expected: 16,
                actual: 20
            })
        ));
    }

    #[test]
    fn test_cross_key_rejected() {
        let codec1 = test_codec(CipherSuite::ChaCha20Poly1305);
        let codec2 = NutCodec::new(
            &NutKey::from_bytes(&[0x43u8; 32]),
            CipherSuite::ChaCha20Poly1305,
        )
        .unwrap();

        let nut = codec1.seal(&[0u8; PAYLOAD_SIZE]).unwrap();
        assert!(matches!(
            codec2.open(nut.as_str()),
            Err(CoreError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_cross_suite_rejected() {
        let key = NutKey::from_bytes(&[0x42u8; 32]);
        let chacha = NutCodec::new(&key, CipherSuite::ChaCha20Poly1305).unwrap();
        let aes = NutCodec::new(&key, CipherSuite::Aes256Gcm).unwrap();

        let nut = chacha.seal(&[0u8; PAYLOAD_SIZE]).unwrap();
        assert!(matches!(
            aes.open(nut.as_str()),
            Err(CoreError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_structured_roundtrip() {
        use crate::crypto::ClientFingerprint;
        use nutkit_common::time::Timestamp;

        let codec = test_codec(CipherSuite::Aes128Gcm);
        let payload = NutPayload::new(
            ClientFingerprint::derive("1.2.3.4", ""),
            Timestamp::from_secs(1_700_000_000),
            7,
            0x1234_5678,
        );
        let nut = codec.encode(&payload).unwrap();
        assert_eq!(codec.decode(nut.as_str()).unwrap(), payload);
    }

    #[test]
    fn test_debug_hides_key() {
        let codec = test_codec(CipherSuite::ChaCha20Poly1305);
        assert_eq!(
            format!("{codec:?}"),
            "NutCodec { suite: ChaCha20Poly1305, .. }"
        );
    }
}
