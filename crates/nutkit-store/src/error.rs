// ============================================
// File: crates/nutkit-store/src/error.rs
// ============================================
//! # Store Error Types
//!
//! ## Creation Reason
//! Defines the errors a `Store` implementation may report. The in-memory
//! store only ever raises `AlreadyExists`, but persistent backends need
//! the rest.
//!
//! ## Error Categories
//! 1. **Conflict Errors**: Duplicate records
//! 2. **Backend Errors**: Unavailable or failing storage
//!
//! ## ⚠️ Important Note for Next Developer
//! - A missing record is `Ok(None)`, not an error
//! - Backend errors are usually transient and retryable
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use std::io;

use thiserror::Error;

// ============================================
// Result Type Alias
// ============================================

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

// ============================================
// StoreError
// ============================================

/// Store error types.
#[derive(Error, Debug)]
pub enum StoreError {
    // ========================================
    // Conflict Errors
    // ========================================

    /// A record with the same key already exists.
    #[error("{entity} already exists: {key}")]
    AlreadyExists {
        /// Kind of record
        entity: &'static str,
        /// Conflicting key
        key: String,
    },

    // ========================================
    // Backend Errors
    // ========================================

    /// The backend could not be reached.
    #[error("Store unavailable: {reason}")]
    Unavailable {
        /// Why the backend is unavailable
        reason: String,
    },

    /// The backend rejected or failed the operation.
    #[error("Store operation '{operation}' failed: {reason}")]
    Backend {
        /// Operation that failed
        operation: &'static str,
        /// Backend error message
        reason: String,
    },

    // ========================================
    // Wrapped Errors
    // ========================================

    /// I/O error from a file-backed store.
    #[error("I/O error: {context}")]
    Io {
        /// What was happening when the error occurred
        context: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    // ========================================
    // Convenience Constructors
    // ========================================

    /// Creates an `AlreadyExists` error.
    pub fn already_exists(entity: &'static str, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity,
            key: key.into(),
        }
    }

    /// Creates a `Backend` error.
    pub fn backend(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Backend {
            operation,
            reason: reason.into(),
        }
    }

    /// Creates an `Io` error with context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    // ========================================
    // Error Classification
    // ========================================

    /// Returns `true` if retrying the operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable { .. } | Self::Backend { .. } => true,
            Self::Io { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }

    /// Returns `true` if the error is a key conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

// ============================================
// Error Conversions
// ============================================

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            context: "unspecified I/O operation".into(),
            source: err,
        }
    }
}

// ============================================
// Tests
// ============================================
