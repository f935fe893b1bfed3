// ============================================
// File: crates/nutkit-core/src/crypto/fingerprint.rs
// ============================================
//! # Client Fingerprints
//!
//! ## Creation Reason
//! Binds a nut to the party it was issued to without putting the party's
//! identifier (usually an IP address) inside the nut.
//!
//! ## Derivation
//! ```text
//! identifier == sentinel  ──►  00 00 00 00   (unbound, check skipped)
//! otherwise               ──►  SHA-256(identifier)[0..4]
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Issue and validate must derive from the same raw identifier string
//! - Four bytes is a binding hint, not an authenticator; the AEAD tag is
//!   what makes the nut unforgeable
//!
//! ## Last Modified
//! v0.1.0 - Initial fingerprint derivation

use std::fmt;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Width of a fingerprint in bytes.
pub const FINGERPRINT_SIZE: usize = 4;

/// Truncated hash of a client identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientFingerprint([u8; FINGERPRINT_SIZE]);

impl ClientFingerprint {
    /// Fingerprint of a nut issued without identity binding.
    pub const UNBOUND: Self = Self([0u8; FINGERPRINT_SIZE]);

    /// Derives the fingerprint for `identifier`.
    ///
    /// Returns [`Self::UNBOUND`] when `identifier` equals `no_client_id`.
    #[must_use]
    pub fn derive(identifier: &str, no_client_id: &str) -> Self {
        if identifier == no_client_id {
            return Self::UNBOUND;
        }
        let digest = Sha256::digest(identifier.as_bytes());
        let mut bytes = [0u8; FINGERPRINT_SIZE];
        bytes.copy_from_slice(&digest[..FINGERPRINT_SIZE]);
        Self(bytes)
    }

    /// Wraps raw fingerprint bytes read from a payload.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; FINGERPRINT_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; FINGERPRINT_SIZE] {
        self.0
    }

    /// Returns `true` if identity binding was not requested.
    #[must_use]
    pub fn is_unbound(&self) -> bool {
        self.matches(&Self::UNBOUND)
    }

    /// Constant-time comparison.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl fmt::Debug for ClientFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientFingerprint({})", hex::encode(self.0))
    }
}

// ============================================
// Tests
// ============================================
