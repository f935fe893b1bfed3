// ============================================
// File: crates/nutkit-common/src/types.rs
// ============================================
//! # Core Type Definitions
//!
//! ## Creation Reason
//! Gives the identifiers that cross crate boundaries distinct types, so a
//! nut can never be passed where a user identity is expected.
//!
//! ## Main Functionality
//! - `Nut`: The opaque transport string handed to a client
//! - `Identity`: A client's public identity key, as presented by the client
//! - `UserId`: Locally generated user record identifier
//!
//! ## ⚠️ Important Note for Next Developer
//! - Outside nutkit-core a `Nut` is only ever compared and hashed, never parsed
//! - `Identity` is distinct from the nut; never key user records by nut
//!
//! ## Last Modified
//! v0.1.0 - Initial type definitions

use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};

// ============================================
// Nut
// ============================================

/// An issued challenge in its transport form.
///
/// The string is ASCII base64 and is used as a map key by stores, so it
/// implements `Hash` and `Eq` on the exact text.
///
/// # Example
/// ```
/// use nutkit_common::types::Nut;
///
/// let nut = Nut::from("abc123");
/// assert_eq!(nut.as_str(), "abc123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nut(String);

impl Nut {
    /// Wraps a transport string.
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Returns the transport string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the nut, returning the transport string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Nut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Nut {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Nut {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Nut {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ============================================
// Identity
// ============================================

/// A client's public identity key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wraps an identity key string.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the identity key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ============================================
// UserId
// ============================================

/// Identifier of a locally stored user record.
///
/// Rendered in the familiar 8-4-4-4-12 hex grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Generates a new random user id.
    #[must_use]
    pub fn generate() -> Self {
        let mut b = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut b);
        Self(format!(
            "{}-{}-{}-{}-{}",
            hex::encode(&b[0..4]),
            hex::encode(&b[4..6]),
            hex::encode(&b[6..8]),
            hex::encode(&b[8..10]),
            hex::encode(&b[10..]),
        ))
    }

    /// Returns the id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================
// Tests
// ============================================
