// ============================================
// File: crates/nutkit-common/src/error.rs
// ============================================
//! # Common Error Types
//!
//! ## Creation Reason
//! Provides foundational error types and result aliases used across
//! all nutkit crates, enabling consistent error handling.
//!
//! ## Design Philosophy
//! - Use `thiserror` for ergonomic error definitions
//! - Each crate defines its own error type that wraps `CommonError`
//! - Errors should be informative without leaking sensitive information
//!
//! ## ⚠️ Important Note for Next Developer
//! - Never include key material or raw client identifiers in error messages
//! - Implement `From` traits for seamless error propagation
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

// ============================================
// Result Type Alias
// ============================================

/// Common result type for operations that may fail.
pub type Result<T> = std::result::Result<T, CommonError>;

// ============================================
// CommonError
// ============================================

/// Common error types shared across nutkit crates.
///
/// # Example
/// ```
/// use nutkit_common::error::{CommonError, Result};
///
/// fn check_key(key: &[u8]) -> Result<()> {
///     if key.len() != 32 {
///         return Err(CommonError::invalid_length(32, key.len()));
///     }
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum CommonError {
    // ========================================
    // Validation Errors
    // ========================================

    /// Data length doesn't match expected size.
    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length received
        actual: usize,
    },

    // ========================================
    // Encoding Errors
    // ========================================

    /// Failed to decode/deserialize data.
    #[error("Decoding error: {context}")]
    Decoding {
        /// What was being decoded
        context: String,
        /// Error details
        details: String,
    },
}

impl CommonError {
    /// Creates an `InvalidLength` error.
    #[must_use]
    pub const fn invalid_length(expected: usize, actual: usize) -> Self {
        Self::InvalidLength { expected, actual }
    }

    /// Creates a `Decoding` error.
    pub fn decoding(context: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Decoding {
            context: context.into(),
            details: details.into(),
        }
    }

    /// Returns `true` if this error was caused by bad caller input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidLength { .. } | Self::Decoding { .. })
    }
}

// ============================================
// Error Conversions
// ============================================

impl From<base64::DecodeError> for CommonError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decoding {
            context: "base64 decode".into(),
            details: err.to_string(),
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

    #[test]
    fn test_error_display() {
        let err = CommonError::invalid_length(32, 16);
        assert!(err.to_string().contains("32"));
        assert!(err.to_string().contains("16"));

        let err = CommonError::decoding("nut key", "invalid padding");
        assert!(err.to_string().contains("nut key"));
    }

    #[test]
    fn test_error_classification() {
        assert!(CommonError::invalid_length(16, 3).is_client_error());
        assert!(CommonError::decoding("key", "bad padding").is_client_error());
    }

    #[test]
    fn test_base64_error_conversion() {
        let err: CommonError = BASE64.decode("not base64!").unwrap_err().into();
        assert!(matches!(err, CommonError::Decoding { .. }));
        assert!(err.is_client_error());
    }
}
