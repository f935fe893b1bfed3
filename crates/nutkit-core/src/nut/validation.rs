// ============================================
// File: crates/nutkit-core/src/nut/validation.rs
// ============================================
//! # Validation Outcome
//!
//! Closed result of checking a nut. Callers that only need to tell the
//! client "rejected" use [`Validation::is_valid`]; logs and tests can match
//! on the specific cause.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

/// Outcome of validating a nut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    /// Authentic, bound to the caller (or unbound) and within expiry.
    Valid,
    /// Not base64, too short, or an unexpected payload size.
    Malformed,
    /// Tag did not verify: forged, tampered or sealed under another key.
    AuthenticationFailed,
    /// Issued to a different client.
    IdentityMismatch,
    /// Older than the configured expiry.
    Expired,
}

impl Validation {
    /// Maps a validation error onto its outcome.
    ///
    /// Errors that cannot arise while validating are reported as
    /// `Malformed`, so nothing outside this set reaches a caller.
    #[must_use]
    pub const fn from_error(err: &CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed => Self::AuthenticationFailed,
            CoreError::IdentityMismatch => Self::IdentityMismatch,
            CoreError::Expired { .. } => Self::Expired,
            _ => Self::Malformed,
        }
    }

    /// Returns `true` for [`Validation::Valid`].
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Short machine-readable name, used as a log field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Malformed => "malformed",
            Self::AuthenticationFailed => "authentication_failed",
            Self::IdentityMismatch => "identity_mismatch",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<T> From<&crate::error::Result<T>> for Validation {
    fn from(result: &crate::error::Result<T>) -> Self {
        match result {
            Ok(_) => Self::Valid,
            Err(e) => Self::from_error(e),
        }
    }
}
