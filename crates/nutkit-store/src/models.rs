// ============================================
// File: crates/nutkit-store/src/models.rs
// ============================================
//! # Store Records
//!
//! Plain data records persisted by a [`Store`](crate::Store). Nuts are
//! opaque keys here; nothing in this crate looks inside them.

use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use nutkit_common::time::Timestamp;
use nutkit_common::types::{Identity, Nut, UserId};

// ============================================
// Transaction
// ============================================

/// One step of a login exchange: the nut that was answered and the nut
/// handed out for the following step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Nut the client answered.
    pub id: Nut,
    /// Nut issued for the next request.
    pub next: Nut,
    /// Client identifier the exchange is bound to.
    pub client_id: String,
    /// When the step was recorded.
    pub created_at: Timestamp,
}

impl Transaction {
    /// Creates a transaction stamped with the current time.
    #[must_use]
    pub fn new(id: Nut, next: Nut, client_id: impl Into<String>) -> Self {
        Self {
            id,
            next,
            client_id: client_id.into(),
            created_at: Timestamp::now(),
        }
    }
}

// ============================================
// IdentToken
// ============================================

/// Size of a generated ident token in bytes (before hex encoding).
pub const IDENT_TOKEN_SIZE: usize = 16;

/// Credential handed to the waiting session once the client has
/// identified out of band.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentToken(String);

impl IdentToken {
    /// Wraps an existing token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Generates a random 128-bit token, hex encoded.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; IDENT_TOKEN_SIZE];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Returns the token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for IdentToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tokens are bearer credentials
        f.write_str("IdentToken(..)")
    }
}

// ============================================
// User
// ============================================

/// A locally registered user, keyed by public identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Local user id.
    pub id: UserId,
    /// Public identity key the user logs in with.
    pub identity: Identity,
}

impl User {
    /// Creates a user with a fresh id.
    #[must_use]
    pub fn new(identity: Identity) -> Self {
        Self {
            id: UserId::generate(),
            identity,
        }
    }
}
