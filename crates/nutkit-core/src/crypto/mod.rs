// ============================================
// File: crates/nutkit-core/src/crypto/mod.rs
// ============================================
//! # Cryptography Module
//!
//! ## Creation Reason
//! Centralizes the cryptographic pieces of nut handling, using audited
//! RustCrypto implementations.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`keys`]: Cipher suites and the symmetric nut key
//! - [`codec`]: Authenticated encryption of payloads into transport strings
//! - [`fingerprint`]: Truncated client identifier hashes
//!
//! ## Nut Envelope
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  base64url( nonce (12 bytes) || AEAD(key, nonce, payload) ) │
//! │                                                             │
//! │  payload (16 bytes) ──► ciphertext (16 bytes) + tag (16)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Properties
//! - **Confidentiality**: Payload contents are opaque to the client
//! - **Integrity**: Any modification fails tag verification
//! - **Freshness**: Random per-message nonce, expiry checked on validation
//!
//! ## ⚠️ Important Note for Next Developer
//! - NEVER roll your own crypto
//! - Nonces come from the OS RNG; a nonce must never repeat under one key
//! - Key material implements Zeroize
//!
//! ## Last Modified
//! v0.1.0 - Initial crypto implementation

pub mod codec;
pub mod fingerprint;
pub mod keys;

// Re-export primary types at module level
pub use codec::NutCodec;
pub use fingerprint::ClientFingerprint;
pub use keys::{CipherSuite, NutKey};

// ============================================
// Constants
// ============================================

/// Size of the AEAD nonce in bytes (96 bits for every supported suite).
pub const AEAD_NONCE_SIZE: usize = 12;

/// Size of the AEAD authentication tag in bytes.
pub const AEAD_TAG_SIZE: usize = 16;

/// Key size for ChaCha20-Poly1305 and AES-256-GCM.
pub const KEY_SIZE_256: usize = 32;

/// Key size for AES-128-GCM.
pub const KEY_SIZE_128: usize = 16;
