// ============================================
// File: crates/nutkit-core/src/lib.rs
// ============================================
//! # nutkit Core - Challenge Nut Engine
//!
//! ## Creation Reason
//! Issues and validates single-use, tamper-evident login challenges
//! ("nuts"). A server hands a client an opaque nut, the client echoes it
//! back, and this crate confirms the nut was issued here, is fresh, and
//! (optionally) came back from the same client.
//!
//! ## Main Functionality
//!
//! ### Crypto Module ([`crypto`])
//! - Cipher suites and the symmetric `NutKey`
//! - `NutCodec`: AEAD seal/open with base64url transport
//! - `ClientFingerprint`: Truncated SHA-256 of the client identifier
//!
//! ### Nut Module ([`nut`])
//! - `NutPayload`: Fixed 16-byte layout with named offsets
//! - `IssuanceCounter`: Owned atomic counter
//! - `Nutter`: Issue / validate with identity and expiry rules
//! - `Validation`: Closed outcome enum
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              nutkit-server                          │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                    │
//! │         ▼                     ▼                    │
//! │   nutkit-core  ◄──      nutkit-store               │
//! │   You are here                │                    │
//! │         │                     │                    │
//! │         └──────────┬──────────┘                    │
//! │                    ▼                               │
//! │             nutkit-common                          │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Guarantees
//! - **Confidentiality**: Payload is AEAD-encrypted
//! - **Integrity**: Any bit flip fails tag verification
//! - **Freshness**: Issue time sealed inside, checked against expiry
//! - **Binding**: Optional client fingerprint, compared in constant time
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL cryptographic code uses audited RustCrypto implementations
//! - The core performs no I/O and never logs above trace level
//! - Single-use enforcement lives in nutkit-store, not here
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod crypto;
pub mod error;
pub mod nut;

// Re-export commonly used items
pub use crypto::{CipherSuite, ClientFingerprint, NutCodec, NutKey};
pub use error::{CoreError, Result};
pub use nut::{
    IssuanceCounter, NutPayload, Nutter, NutterConfig, Validation,
    DEFAULT_EXPIRY, DEFAULT_NO_CLIENT_ID, PAYLOAD_SIZE,
};
