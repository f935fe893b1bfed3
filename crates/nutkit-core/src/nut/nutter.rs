// ============================================
// File: crates/nutkit-core/src/nut/nutter.rs
// ============================================
//! # Nutter - Challenge Issuance and Validation
//!
//! ## Creation Reason
//! Applies the business rules (identity binding and expiry window) on top
//! of the raw codec, and owns the issuance counter.
//!
//! ## Main Functionality
//! - `NutterConfig`: Expiry, sentinel identifier and cipher suite
//! - `Nutter::issue`: Build a payload and seal it
//! - `Nutter::validate`: Decode, then identity check, then expiry check
//!
//! ## Validation Pipeline
//! ```text
//! nut ──► decode ──► fingerprint ──► age <= expiry ──► Valid
//!           │          │                │
//!           ▼          ▼                ▼
//!        Malformed  IdentityMismatch  Expired
//!        AuthenticationFailed
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Validation does NOT consume the nut; single-use is the store's job
//! - A nut stamped in the future (clock skew) has a negative age and passes
//!   the expiry check
//! - Only trace-level events here; rejection logging belongs to the caller
//!
//! ## Last Modified
//! v0.1.0 - Initial issuance and validation

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::OsRng;
use rand::RngCore;
use tracing::trace;

use nutkit_common::time::{Clock, SystemClock, Timestamp};
use nutkit_common::types::Nut;

use super::counter::IssuanceCounter;
use super::payload::NutPayload;
use super::validation::Validation;
use crate::crypto::{CipherSuite, ClientFingerprint, NutCodec, NutKey};
use crate::error::{CoreError, Result};

// ============================================
// Constants
// ============================================

/// Default nut lifetime (5 minutes).
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(300);

/// Default sentinel identifier meaning "no identity binding".
pub const DEFAULT_NO_CLIENT_ID: &str = "";

// ============================================
// NutterConfig
// ============================================

/// Construction-time settings for a [`Nutter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NutterConfig {
    /// Maximum nut age; a nut exactly this old is still valid.
    pub expiry: Duration,
    /// Client identifier that disables identity binding.
    pub no_client_id: String,
    /// AEAD suite used to seal nuts.
    pub suite: CipherSuite,
}

impl Default for NutterConfig {
    fn default() -> Self {
        Self {
            expiry: DEFAULT_EXPIRY,
            no_client_id: DEFAULT_NO_CLIENT_ID.to_string(),
            suite: CipherSuite::default(),
        }
    }
}

impl NutterConfig {
    /// Sets the expiry window.
    #[must_use]
    pub const fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    /// Sets the sentinel identifier.
    #[must_use]
    pub fn with_no_client_id(mut self, sentinel: impl Into<String>) -> Self {
        self.no_client_id = sentinel.into();
        self
    }

    /// Sets the cipher suite.
    #[must_use]
    pub const fn with_suite(mut self, suite: CipherSuite) -> Self {
        self.suite = suite;
        self
    }
}

// ============================================
// Nutter
// ============================================

/// Issues and validates nuts under one fixed key.
///
/// `Nutter` is `Send + Sync`; share it behind an `Arc` and call
/// [`issue`](Self::issue) and [`validate`](Self::validate) from any number
/// of threads. The only mutable state is the owned issuance counter.
///
/// # Example
/// ```
/// use nutkit_core::{NutKey, Nutter, NutterConfig, Validation};
///
/// let config = NutterConfig::default();
/// let key = NutKey::generate(config.suite).unwrap();
/// let nutter = Nutter::new(&key, config).unwrap();
///
/// let nut = nutter.issue("203.0.113.7").unwrap();
/// assert!(nutter.is_valid(nut.as_str(), "203.0.113.7"));
/// assert_eq!(nutter.check(nut.as_str(), "198.51.100.1"), Validation::IdentityMismatch);
/// ```
#[derive(Debug)]
pub struct Nutter {
    codec: NutCodec,
    counter: IssuanceCounter,
    config: NutterConfig,
    clock: Arc<dyn Clock>,
}

impl Nutter {
    /// Creates a nutter reading wall-clock time.
    ///
    /// # Errors
    /// Returns `Common(InvalidLength)` if `key` does not fit `config.suite`.
    pub fn new(key: &NutKey, config: NutterConfig) -> Result<Self> {
        let codec = NutCodec::new(key, config.suite)?;
        Ok(Self {
            codec,
            counter: IssuanceCounter::new(),
            config,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the expiry window.
    #[must_use]
    pub const fn expiry(&self) -> Duration {
        self.config.expiry
    }

    /// Current time according to this nutter's clock.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Oldest issue time that still passes the expiry check at `now()`.
    ///
    /// Every nut issued strictly before this instant is expired.
    #[must_use]
    pub fn oldest_valid_issue(&self) -> Timestamp {
        let max_age = i64::try_from(self.config.expiry.as_secs()).unwrap_or(i64::MAX);
        Timestamp::from_secs(self.now().as_secs().saturating_sub(max_age))
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &NutterConfig {
        &self.config
    }

    /// Returns how many nuts this instance has issued (modulo 2^32).
    #[must_use]
    pub fn issued_count(&self) -> u32 {
        self.counter.current()
    }

    /// Issues a new nut for `client_id`.
    ///
    /// Passing the configured sentinel issues an unbound nut.
    ///
    /// # Errors
    /// `RandomSourceFailure` if the OS generator fails. No nut is produced
    /// in that case.
    pub fn issue(&self, client_id: &str) -> Result<Nut> {
        let mut noise = [0u8; 4];
        OsRng
            .try_fill_bytes(&mut noise)
            .map_err(|e| CoreError::random_source(e.to_string()))?;

        let payload = NutPayload::new(
            self.fingerprint(client_id),
            self.clock.now(),
            self.counter.next(),
            u32::from_be_bytes(noise),
        );

        let nut = self.codec.encode(&payload)?;
        trace!(counter = payload.counter, "Issued nut");
        Ok(nut)
    }

    /// Validates `nut` for `client_id` and returns its payload.
    ///
    /// Checks run in order and stop at the first failure.
    ///
    /// # Errors
    /// - Any codec decode error
    /// - `IdentityMismatch`: bound to a different client
    /// - `Expired`: older than the expiry window
    pub fn validate(&self, nut: &str, client_id: &str) -> Result<NutPayload> {
        let payload = self.codec.decode(nut)?;

        if !payload.fingerprint.is_unbound()
            && !payload.fingerprint.matches(&self.fingerprint(client_id))
        {
            return Err(CoreError::IdentityMismatch);
        }

        let age = self.clock.now().elapsed_since(payload.issued_at);
        let max_age = self.config.expiry.as_secs();
        if age > i64::try_from(max_age).unwrap_or(i64::MAX) {
            return Err(CoreError::Expired {
                age_secs: age,
                max_age_secs: max_age,
            });
        }

        trace!(counter = payload.counter, age_secs = age, "Validated nut");
        Ok(payload)
    }

    /// Validates `nut` and reports the outcome as a [`Validation`].
    #[must_use]
    pub fn check(&self, nut: &str, client_id: &str) -> Validation {
        Validation::from(&self.validate(nut, client_id))
    }

    /// Returns `true` if `nut` is valid for `client_id`.
    #[must_use]
    pub fn is_valid(&self, nut: &str, client_id: &str) -> bool {
        self.validate(nut, client_id).is_ok()
    }

    fn fingerprint(&self, client_id: &str) -> ClientFingerprint {
        ClientFingerprint::derive(client_id, &self.config.no_client_id)
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use nutkit_common::error::CommonError;
    use nutkit_common::time::ManualClock;
    use std::collections::HashSet;
    use std::thread;

    const NOW: i64 = 1_700_000_000;

    fn test_nutter(clock: &Arc<ManualClock>) -> Nutter {
        let key = NutKey::from_bytes(&[0x42u8; 32]);
        Nutter::new(&key, NutterConfig::default())
            .unwrap()
            .with_clock(clock.clone())
    }

    #[test]
    fn test_issue_then_validate() {
        let clock = Arc::new(ManualClock::at(NOW));
        let nutter = test_nutter(&clock);

        let nut = nutter.issue("1.2.3.4").unwrap();
        let payload = nutter.validate(nut.as_str(), "1.2.3.4").unwrap();

        assert_eq!(payload.issued_at.as_secs(), NOW);
        assert_eq!(payload.counter, 1);
        assert_eq!(payload.noise & 1, 0);
        assert_eq!(nutter.check(nut.as_str(), "1.2.3.4"), Validation::Valid);
    }

    #[test]
    fn test_identity_mismatch() {
        let clock = Arc::new(ManualClock::at(NOW));
        let nutter = test_nutter(&clock);

        let nut = nutter.issue("1.2.3.4").unwrap();
        assert!(matches!(
            nutter.validate(nut.as_str(), "5.6.7.8"),
            Err(CoreError::IdentityMismatch)
        ));
        assert!(!nutter.is_valid(nut.as_str(), "5.6.7.8"));
    }

    #[test]
    fn test_sentinel_skips_binding() {
        let clock = Arc::new(ManualClock::at(NOW));
        let nutter = test_nutter(&clock);

        let nut = nutter.issue(DEFAULT_NO_CLIENT_ID).unwrap();
        assert!(nutter.is_valid(nut.as_str(), "anything"));
        assert!(nutter.is_valid(nut.as_str(), "5.6.7.8"));
    }

    #[test]
    fn test_custom_sentinel() {
        let key = NutKey::from_bytes(&[0x42u8; 32]);
        let config = NutterConfig::default().with_no_client_id("none");
        let nutter = Nutter::new(&key, config).unwrap();

        let unbound = nutter.issue("none").unwrap();
        assert!(nutter.is_valid(unbound.as_str(), "1.2.3.4"));

        // The empty string is an ordinary identifier under this config
        let bound = nutter.issue("").unwrap();
        assert_eq!(
            nutter.check(bound.as_str(), "1.2.3.4"),
            Validation::IdentityMismatch
        );
    }

    #[test]
    fn test_expiry_boundary_inclusive() {
        let clock = Arc::new(ManualClock::at(NOW));
        let nutter = test_nutter(&clock);
        let nut = nutter.issue("1.2.3.4").unwrap();

        clock.set(NOW + 300);
        assert!(nutter.is_valid(nut.as_str(), "1.2.3.4"));

        clock.set(NOW + 301);
        assert!(matches!(
            nutter.validate(nut.as_str(), "1.2.3.4"),
            Err(CoreError::Expired {
                age_secs: 301,
                max_age_secs: 300
            })
        ));
    }

    #[test]
    fn test_oldest_valid_issue_tracks_clock() {
        let clock = Arc::new(ManualClock::at(NOW));
        let nutter = test_nutter(&clock);
        assert_eq!(nutter.oldest_valid_issue().as_secs(), NOW - 300);

        let nut = nutter.issue("1.2.3.4").unwrap();
        clock.advance(Duration::from_secs(300));
        assert_eq!(nutter.oldest_valid_issue().as_secs(), NOW);
        assert!(nutter.is_valid(nut.as_str(), "1.2.3.4"));

        clock.advance(Duration::from_secs(1));
        assert!(nutter.oldest_valid_issue().as_secs() > NOW);
        assert!(!nutter.is_valid(nut.as_str(), "1.2.3.4"));
    }

    #[test]
    fn test_custom_expiry() {
        let clock = Arc::new(ManualClock::at(NOW));
        let key = NutKey::from_bytes(&[0x42u8; 32]);
        let nutter = Nutter::new(
            &key,
            NutterConfig::default().with_expiry(Duration::from_secs(10)),
        )
        .unwrap()
        .with_clock(clock.clone());

        assert_eq!(nutter.expiry(), Duration::from_secs(10));
        let nut = nutter.issue("1.2.3.4").unwrap();

        clock.advance(Duration::from_secs(10));
        assert!(nutter.is_valid(nut.as_str(), "1.2.3.4"));
        clock.advance(Duration::from_secs(1));
        assert_eq!(nutter.check(nut.as_str(), "1.2.3.4"), Validation::Expired);
    }

    #[test]
    fn test_future_issue_time_accepted() {
        let clock = Arc::new(ManualClock::at(NOW));
        let nutter = test_nutter(&clock);
        let nut = nutter.issue("1.2.3.4").unwrap();

        clock.set(NOW - 60);
        assert!(nutter.is_valid(nut.as_str(), "1.2.3.4"));
    }

    #[test]
    fn test_identity_checked_before_expiry() {
        let clock = Arc::new(ManualClock::at(NOW));
        let nutter = test_nutter(&clock);
        let nut = nutter.issue("1.2.3.4").unwrap();

        clock.set(NOW + 10_000);
        assert_eq!(
            nutter.check(nut.as_str(), "5.6.7.8"),
            Validation::IdentityMismatch
        );
    }

    #[test]
    fn test_consecutive_issues_differ() {
        let clock = Arc::new(ManualClock::at(NOW));
        let nutter = test_nutter(&clock);

        let a = nutter.issue("1.2.3.4").unwrap();
        let b = nutter.issue("1.2.3.4").unwrap();
        assert_ne!(a, b);

        let pa = nutter.validate(a.as_str(), "1.2.3.4").unwrap();
        let pb = nutter.validate(b.as_str(), "1.2.3.4").unwrap();
        assert_eq!(pb.counter, pa.counter + 1);
        assert_eq!(nutter.issued_count(), 2);
    }

    #[test]
    fn test_cross_key_rejected() {
        let clock = Arc::new(ManualClock::at(NOW));
        let nutter1 = test_nutter(&clock);
        let nutter2 = Nutter::new(&NutKey::from_bytes(&[0x24u8; 32]), NutterConfig::default())
            .unwrap()
            .with_clock(clock.clone());

        let nut = nutter1.issue("1.2.3.4").unwrap();
        assert_eq!(
            nutter2.check(nut.as_str(), "1.2.3.4"),
            Validation::AuthenticationFailed
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let clock = Arc::new(ManualClock::at(NOW));
        let nutter = test_nutter(&clock);
        assert_eq!(nutter.check("%%%", "1.2.3.4"), Validation::Malformed);
        assert_eq!(nutter.check("", "1.2.3.4"), Validation::Malformed);
    }

    #[test]
    fn test_instances_have_independent_counters() {
        let clock = Arc::new(ManualClock::at(NOW));
        let a = test_nutter(&clock);
        let b = test_nutter(&clock);

        a.issue("x").unwrap();
        a.issue("x").unwrap();
        let nut = b.issue("x").unwrap();

        assert_eq!(b.validate(nut.as_str(), "x").unwrap().counter, 1);
        assert_eq!(a.issued_count(), 2);
    }

    #[test]
    fn test_invalid_key_rejected_at_construction() {
        let key = NutKey::from_bytes(&[0u8; 31]);
        assert!(matches!(
            Nutter::new(&key, NutterConfig::default()),
            Err(CoreError::Common(CommonError::InvalidLength { .. }))
        ));
    }

    #[test]
    fn test_concurrent_issue_distinct_counters() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 250;

        let clock = Arc::new(ManualClock::at(NOW));
        let nutter = Arc::new(test_nutter(&clock));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let nutter = Arc::clone(&nutter);
                thread::spawn(move || {
                    (0..PER_THREAD)
                        .map(|_| {
                            let nut = nutter.issue("1.2.3.4").unwrap();
                            nutter.validate(nut.as_str(), "1.2.3.4").unwrap().counter
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for counter in handle.join().unwrap() {
                assert!(seen.insert(counter), "duplicate counter {counter}");
            }
        }
        assert_eq!(seen.len(), THREADS * PER_THREAD);
        assert_eq!(nutter.issued_count() as usize, THREADS * PER_THREAD);
    }

    #[test]
    fn test_nutter_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Nutter>();
    }
}
