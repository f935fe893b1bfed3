// ============================================
// File: crates/nutkit-core/src/nut/payload.rs
// ============================================
//! # Nut Payload
//!
//! ## Creation Reason
//! Defines the fixed 128-bit plaintext sealed inside every nut and its
//! explicit byte layout.
//!
//! ## Wire Format
//! All multi-byte integers are big-endian.
//! ```text
//! ┌────────┬──────────────────────────────────────────────┐
//! │ 0..4   │ client fingerprint (00000000 = unbound)      │
//! │ 4..8   │ issued-at, Unix seconds (u32)                │
//! │ 8..12  │ issuance counter (u32)                       │
//! │ 12..16 │ noise (u32), bit 0 reserved                  │
//! └────────┴──────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Bit 0 of the noise word is reserved for a future source flag; it is
//!   issued as zero and never interpreted
//! - Changing offsets invalidates every outstanding nut
//!
//! ## Last Modified
//! v0.1.0 - Initial payload layout

use bytes::{Buf, BufMut};

use nutkit_common::time::Timestamp;

use crate::crypto::fingerprint::{ClientFingerprint, FINGERPRINT_SIZE};
use crate::error::{CoreError, Result};

// ============================================
// Layout Constants
// ============================================

/// Size of a nut payload in bytes.
pub const PAYLOAD_SIZE: usize = 16;

/// Offset of the client fingerprint.
pub const FINGERPRINT_OFFSET: usize = 0;

/// Offset of the issued-at timestamp.
pub const ISSUED_AT_OFFSET: usize = 4;

/// Offset of the issuance counter.
pub const COUNTER_OFFSET: usize = 8;

/// Offset of the noise word.
pub const NOISE_OFFSET: usize = 12;

/// Noise bits held back for forward compatibility.
pub const NOISE_RESERVED_MASK: u32 = 0x0000_0001;

// ============================================
// NutPayload
// ============================================

/// Decoded contents of a nut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NutPayload {
    /// Identity binding, or [`ClientFingerprint::UNBOUND`].
    pub fingerprint: ClientFingerprint,
    /// When the nut was issued (truncated to 32 bits).
    pub issued_at: Timestamp,
    /// Issuance counter value at the time of issue.
    pub counter: u32,
    /// Random filler; not semantically checked.
    pub noise: u32,
}

impl NutPayload {
    /// Builds a payload, clearing the reserved noise bits.
    #[must_use]
    pub const fn new(
        fingerprint: ClientFingerprint,
        issued_at: Timestamp,
        counter: u32,
        noise: u32,
    ) -> Self {
        Self {
            fingerprint,
            issued_at,
            counter,
            noise: noise & !NOISE_RESERVED_MASK,
        }
    }

    /// Serializes the payload into its fixed layout.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; PAYLOAD_SIZE] {
        let mut out = [0u8; PAYLOAD_SIZE];
        let mut buf = &mut out[..];
        buf.put_slice(&self.fingerprint.to_bytes());
        buf.put_u32(self.issued_at.to_be_u32());
        buf.put_u32(self.counter);
        buf.put_u32(self.noise);
        out
    }

    /// Parses a payload from its fixed layout.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; PAYLOAD_SIZE]) -> Self {
        let mut buf = &bytes[..];
        let mut fingerprint = [0u8; FINGERPRINT_SIZE];
        buf.copy_to_slice(&mut fingerprint);
        let issued_at = Timestamp::from_be_u32(buf.get_u32());
        let counter = buf.get_u32();
        let noise = buf.get_u32();

        Self {
            fingerprint: ClientFingerprint::from_bytes(fingerprint),
            issued_at,
            counter,
            noise,
        }
    }
}

impl TryFrom<&[u8]> for NutPayload {
    type Error = CoreError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let array: &[u8; PAYLOAD_SIZE] =
            bytes.try_into().map_err(|_| CoreError::WrongPayloadSize {
                expected: PAYLOAD_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self::from_bytes(array))
    }
}

// ============================================
// Tests
// ============================================
