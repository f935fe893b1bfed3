// ============================================
// File: crates/nutkit-server/src/keyfile.rs
// ============================================
//! # Nut Key File
//!
//! ## Creation Reason
//! Persists the nut key outside the main configuration so the config can
//! be shared or checked in without the secret.
//!
//! ## File Format
//! ```json
//! {
//!   "cipher": "chacha20-poly1305",
//!   "key": "<base64>",
//!   "created_at": 1700000000
//! }
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Files are written with mode 0600 on Unix
//! - Replacing the key invalidates every outstanding nut
//!
//! ## Last Modified
//! v0.1.0 - Initial key file support

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use nutkit_common::time::Timestamp;
use nutkit_core::crypto::{CipherSuite, NutKey};

use crate::error::{Result, ServerError};

/// On-disk representation of a nut key.
#[derive(Clone, Serialize, Deserialize)]
pub struct KeyFile {
    /// Suite the key was generated for.
    pub cipher: CipherSuite,
    /// Standard base64 key bytes.
    pub key: String,
    /// When the key was generated (Unix seconds).
    pub created_at: Timestamp,
}

impl KeyFile {
    /// Generates a fresh key for `suite`.
    ///
    /// # Errors
    /// Fails if the OS random source is unavailable.
    pub fn generate(suite: CipherSuite) -> Result<Self> {
        let key = NutKey::generate(suite)?;
        Ok(Self {
            cipher: suite,
            key: key.to_base64(),
            created_at: Timestamp::now(),
        })
    }

    /// Decodes the stored key.
    ///
    /// # Errors
    /// `Core(Common(Decoding))` if the key is not valid base64.
    pub fn nut_key(&self) -> Result<NutKey> {
        Ok(NutKey::from_base64(&self.key)?)
    }

    /// Reads a key file.
    ///
    /// # Errors
    /// `KeyFile` if the file cannot be read or parsed.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ServerError::key_file(&path_str, e.to_string()))?;

        serde_json::from_str(&content).map_err(|e| ServerError::key_file(&path_str, e.to_string()))
    }

    /// Writes the key file, creating parent directories as needed.
    ///
    /// # Errors
    /// `KeyFile` on serialization failure, `Io` on write failure.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ServerError::key_file(path.display().to_string(), e.to_string()))?;
        tokio::fs::write(path, content).await?;

        // Set restrictive permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = tokio::fs::metadata(path).await?.permissions();
            perms.set_mode(0o600);
            tokio::fs::set_permissions(path, perms).await?;
        }

        info!(path = %path.display(), cipher = %self.cipher, "Saved nut key file");
        Ok(())
    }
}

impl std::fmt::Debug for KeyFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyFile")
            .field("cipher", &self.cipher)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
