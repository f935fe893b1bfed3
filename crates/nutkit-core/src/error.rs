// ============================================
// File: crates/nutkit-core/src/error.rs
// ============================================
//! # Core Error Types
//!
//! ## Creation Reason
//! Defines the error taxonomy for nut issuance and validation.
//!
//! ## Error Categories
//! 1. **Fatal**: Bad key configuration, random source failure
//! 2. **Crypto/Structural**: The nut did not decode or authenticate
//! 3. **Rule Rejections**: The nut is authentic but bound to another
//!    client or too old
//!
//! ## ⚠️ Important Note for Next Developer
//! - NEVER include key material or client identifiers in error messages
//! - Callers collapse every validation error into one reject signal on the
//!   wire; the variants exist for diagnostics and tests only
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

use nutkit_common::error::CommonError;

// ============================================
// Result Type Alias
// ============================================

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

// ============================================
// CoreError
// ============================================

/// Errors raised while configuring, issuing or validating nuts.
#[derive(Error, Debug)]
pub enum CoreError {
    // ========================================
    // Fatal Errors
    // ========================================

    /// The codec could not be built from the supplied key.
    #[error("Invalid nut configuration: {reason}")]
    Configuration {
        /// What is wrong with the configuration
        reason: String,
    },

    /// The secure random generator could not produce bytes.
    #[error("Secure random source failure: {reason}")]
    RandomSourceFailure {
        /// Error reported by the generator
        reason: String,
    },

    /// Sealing the payload failed.
    #[error("Encryption failed: {context}")]
    Encryption {
        /// What was being encrypted
        context: String,
    },

    // ========================================
    // Decode Errors
    // ========================================

    /// The nut is not valid base64.
    #[error("Malformed nut encoding")]
    MalformedEncoding,

    /// The decoded nut is too short to hold a nonce and ciphertext.
    #[error("Nut truncated: need more than {min} bytes, got {actual}")]
    Truncated {
        /// Length that must be exceeded
        min: usize,
        /// Length received
        actual: usize,
    },

    /// The authentication tag did not verify.
    #[error("Nut authentication failed")]
    AuthenticationFailed,

    /// The opened plaintext is not a nut payload.
    #[error("Wrong payload size: expected {expected}, got {actual}")]
    WrongPayloadSize {
        /// Payload size in bytes
        expected: usize,
        /// Plaintext size received
        actual: usize,
    },

    // ========================================
    // Rule Rejections
    // ========================================

    /// The nut was issued to a different client.
    #[error("Client identity does not match the nut")]
    IdentityMismatch,

    /// The nut is older than the configured expiry.
    #[error("Nut expired: issued {age_secs}s ago, limit {max_age_secs}s")]
    Expired {
        /// Seconds since issuance
        age_secs: i64,
        /// Configured expiry in seconds
        max_age_secs: u64,
    },

    // ========================================
    // Wrapped Errors
    // ========================================

    /// Error from common crate.
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl CoreError {
    /// Creates a `Configuration` error.
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Creates a `RandomSourceFailure` error.
    pub fn random_source(reason: impl Into<String>) -> Self {
        Self::RandomSourceFailure {
            reason: reason.into(),
        }
    }

    /// Creates a `Truncated` error.
    #[must_use]
    pub const fn truncated(min: usize, actual: usize) -> Self {
        Self::Truncated { min, actual }
    }

    // ========================================
    // Error Classification
    // ========================================

    /// Returns `true` if the nut failed to decode or authenticate.
    #[must_use]
    pub const fn is_crypto_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedEncoding
                | Self::Truncated { .. }
                | Self::AuthenticationFailed
                | Self::WrongPayloadSize { .. }
        )
    }

    /// Returns `true` if the nut was authentic but rejected by a rule.
    #[must_use]
    pub const fn is_rule_rejection(&self) -> bool {
        matches!(self, Self::IdentityMismatch | Self::Expired { .. })
    }

    /// Returns `true` if no retry can succeed without operator action.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. }
                | Self::RandomSourceFailure { .. }
                | Self::Encryption { .. }
                | Self::Common(_)
        )
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::truncated(12, 5);
        assert!(err.to_string().contains("12"));
        assert!(err.to_string().contains('5'));

        let err = CoreError::Expired {
            age_secs: 301,
            max_age_secs: 300,
        };
        assert!(err.to_string().contains("301"));
    }

    #[test]
    fn test_error_classification() {
        assert!(CoreError::AuthenticationFailed.is_crypto_error());
        assert!(CoreError::MalformedEncoding.is_crypto_error());
        assert!(!CoreError::AuthenticationFailed.is_rule_rejection());

        assert!(CoreError::IdentityMismatch.is_rule_rejection());
        assert!(!CoreError::IdentityMismatch.is_crypto_error());

        assert!(CoreError::configuration("bad key").is_fatal());
        assert!(CoreError::random_source("exhausted").is_fatal());
        assert!(!CoreError::AuthenticationFailed.is_fatal());
    }

    #[test]
    fn test_common_error_conversion() {
        let common = CommonError::invalid_length(32, 16);
        let core: CoreError = common.into();
        assert!(matches!(core, CoreError::Common(_)));
        assert!(core.is_fatal());
        assert!(!core.is_crypto_error());
    }
}
