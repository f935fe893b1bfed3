// ============================================
// File: crates/nutkit-server/src/config.rs
// ============================================
//! # Server Configuration
//!
//! ## Creation Reason
//! Provides configuration management for the nutkit service, loaded from
//! a TOML file.
//!
//! ## Main Functionality
//! - `ServerConfig`: Main configuration structure
//! - TOML file loading and parsing
//! - Configuration validation
//! - Nut key resolution (inline or key file)
//!
//! ## Configuration Sections
//! - `nut`: Key source, cipher suite, expiry and sentinel identifier
//! - `logging`: Log level
//!
//! ## Example Configuration
//! ```toml
//! [nut]
//! key_file = "/etc/nutkit/nut_key.json"
//! cipher = "chacha20-poly1305"
//! expiry_secs = 300
//! no_client_id = ""
//!
//! [logging]
//! level = "info"
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - All config changes require restart
//! - Exactly one of `nut.key` / `nut.key_file` must be set
//! - An inline `nut.key` puts the secret in the config file; prefer
//!   `key_file` outside development
//!
//! ## Last Modified
//! v0.1.0 - Initial configuration implementation

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use nutkit_core::crypto::{CipherSuite, NutKey};
use nutkit_core::{NutterConfig, DEFAULT_EXPIRY, DEFAULT_NO_CLIENT_ID};

use crate::error::{Result, ServerError};
use crate::keyfile::KeyFile;

// ============================================
// ServerConfig
// ============================================

/// Main server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Nut issuance configuration.
    #[serde(default)]
    pub nut: NutSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns error if file cannot be read, parsed or validated.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        info!("Loading configuration from: {}", path_str);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ServerError::config_load(&path_str, e.to_string()))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ServerError::config_load(&path_str, e.to_string()))?;

        config.validate()?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Loads configuration from a string (useful for testing).
    ///
    /// # Errors
    /// Returns error if the string cannot be parsed or validated.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ServerError::config_load("<string>", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// `ConfigInvalid` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        self.nut.validate()?;
        Ok(())
    }

    /// Serializes configuration to TOML string.
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Builds the `Nutter` settings from the `nut` section.
    #[must_use]
    pub fn nutter_config(&self) -> NutterConfig {
        NutterConfig::default()
            .with_expiry(self.nut.expiry())
            .with_no_client_id(self.nut.no_client_id.clone())
            .with_suite(self.nut.cipher)
    }
}

// ============================================
// NutSection
// ============================================

/// Nut configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutSection {
    /// Inline standard base64 key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Path to a JSON key file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,

    /// Cipher suite.
    #[serde(default)]
    pub cipher: CipherSuite,

    /// Nut lifetime in seconds.
    #[serde(default = "default_expiry_secs")]
    pub expiry_secs: u64,

    /// Client identifier meaning "no identity binding".
    #[serde(default = "default_no_client_id")]
    pub no_client_id: String,
}

fn default_key_file() -> PathBuf {
    PathBuf::from("/etc/nutkit/nut_key.json")
}

fn default_expiry_secs() -> u64 {
    DEFAULT_EXPIRY.as_secs()
}

fn default_no_client_id() -> String {
    DEFAULT_NO_CLIENT_ID.to_string()
}

impl NutSection {
    fn validate(&self) -> Result<()> {
        match (&self.key, &self.key_file) {
            (Some(_), Some(_)) => {
                return Err(ServerError::config_invalid(
                    "nut.key",
                    "set either key or key_file, not both",
                ));
            }
            (None, None) => {
                return Err(ServerError::config_invalid(
                    "nut.key",
                    "one of key or key_file must be set",
                ));
            }
            _ => {}
        }

        if let Some(key) = &self.key {
            let key = NutKey::from_base64(key)
                .map_err(|_| ServerError::config_invalid("nut.key", "not valid base64"))?;
            self.check_key_len(&key)?;
        }

        if self.expiry_secs == 0 {
            return Err(ServerError::config_invalid(
                "nut.expiry_secs",
                "must be greater than 0",
            ));
        }

        Ok(())
    }

    fn check_key_len(&self, key: &NutKey) -> Result<()> {
        if key.len() != self.cipher.key_len() {
            return Err(ServerError::config_invalid(
                "nut.key",
                format!(
                    "{} requires a {}-byte key, got {} bytes",
                    self.cipher,
                    self.cipher.key_len(),
                    key.len()
                ),
            ));
        }
        Ok(())
    }

    /// Returns the expiry window.
    #[must_use]
    pub const fn expiry(&self) -> Duration {
        Duration::from_secs(self.expiry_secs)
    }

    /// Resolves the configured nut key.
    ///
    /// # Errors
    /// - `KeyFile` if the key file cannot be read
    /// - `ConfigInvalid` if the key does not fit the configured cipher
    pub async fn resolve_key(&self) -> Result<NutKey> {
        let key = match (&self.key, &self.key_file) {
            (Some(inline), None) => NutKey::from_base64(inline)
                .map_err(|_| ServerError::config_invalid("nut.key", "not valid base64"))?,
            (None, Some(path)) => {
                let file = KeyFile::load(path).await?;
                if file.cipher != self.cipher {
                    return Err(ServerError::config_invalid(
                        "nut.cipher",
                        format!(
                            "key file was generated for {}, config requests {}",
                            file.cipher, self.cipher
                        ),
                    ));
                }
                file.nut_key()?
            }
            _ => {
                return Err(ServerError::config_invalid(
                    "nut.key",
                    "exactly one of key or key_file must be set",
                ))
            }
        };

        self.check_key_len(&key)?;
        Ok(key)
    }
}

impl Default for NutSection {
    fn default() -> Self {
        Self {
            key: None,
            key_file: Some(default_key_file()),
            cipher: CipherSuite::default(),
            expiry_secs: default_expiry_secs(),
            no_client_id: default_no_client_id(),
        }
    }
}

// ============================================
// LoggingConfig
// ============================================

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============================================
// Tests
// ============================================
