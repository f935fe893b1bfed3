// ============================================
// File: crates/nutkit-server/src/error.rs
// ============================================
//! # Server Error Types
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

use nutkit_core::error::CoreError;
use nutkit_core::Validation;
use nutkit_store::error::StoreError;

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Server error types.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to load configuration from '{path}': {reason}")]
    ConfigLoad {
        path: String,
        reason: String,
    },

    #[error("Invalid configuration: {field} - {reason}")]
    ConfigInvalid {
        field: String,
        reason: String,
    },

    #[error("Key file '{path}': {reason}")]
    KeyFile {
        path: String,
        reason: String,
    },

    #[error("Nut rejected: {0}")]
    NutRejected(Validation),

    #[error("Nut already used")]
    NutReused,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub fn config_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn config_invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn key_file(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::KeyFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigLoad { .. } | Self::ConfigInvalid { .. } | Self::KeyFile { .. }
        )
    }

    /// Returns `true` if the client's nut was refused.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::NutRejected(_) | Self::NutReused)
    }

    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::ConfigLoad { .. } | Self::ConfigInvalid { .. } | Self::KeyFile { .. } => true,
            Self::Core(e) => e.is_fatal(),
            _ => false,
        }
    }

    /// Returns the validation outcome carried by a rejection.
    #[must_use]
    pub const fn validation(&self) -> Option<Validation> {
        match self {
            Self::NutRejected(v) => Some(*v),
            _ => None,
        }
    }
}
