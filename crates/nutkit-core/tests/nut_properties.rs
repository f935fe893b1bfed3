//! Behavioral guarantees of issued nuts, exercised through the public API
//! only: round-trip, uniqueness, tamper detection, expiry boundary,
//! identity binding, concurrent issuance and cross-key rejection.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{Rng, RngCore};

use nutkit_common::time::ManualClock;
use nutkit_core::{
    CipherSuite, CoreError, NutCodec, NutKey, Nutter, NutterConfig, Validation, PAYLOAD_SIZE,
};

const ISSUED_AT: i64 = 1_700_000_000;
const NONCE_LEN: usize = 12;

fn nutter_at(clock: &Arc<ManualClock>, suite: CipherSuite) -> Nutter {
    let key = NutKey::generate(suite).unwrap();
    Nutter::new(&key, NutterConfig::default().with_suite(suite))
        .unwrap()
        .with_clock(clock.clone())
}

// ── round-trip ──────────────────────────────────────────────────────

#[test]
fn random_payloads_round_trip_under_random_keys() {
    let mut rng = rand::thread_rng();
    for suite in CipherSuite::ALL {
        for _ in 0..100 {
            let key = NutKey::generate(suite).unwrap();
            let codec = NutCodec::new(&key, suite).unwrap();

            let mut payload = [0u8; PAYLOAD_SIZE];
            rng.fill_bytes(&mut payload);

            let nut = codec.seal(&payload).unwrap();
            assert_eq!(codec.open(nut.as_str()).unwrap(), payload);
        }
    }
}

// ── uniqueness ──────────────────────────────────────────────────────

#[test]
fn consecutive_issues_never_repeat() {
    let clock = Arc::new(ManualClock::at(ISSUED_AT));
    let nutter = nutter_at(&clock, CipherSuite::ChaCha20Poly1305);

    let nuts: HashSet<_> = (0..1_000).map(|_| nutter.issue("1.2.3.4").unwrap()).collect();
    assert_eq!(nuts.len(), 1_000);
}

// ── tamper detection ────────────────────────────────────────────────

#[test]
fn random_bit_flips_fail_authentication() {
    let mut rng = rand::thread_rng();
    let key = NutKey::generate(CipherSuite::Aes256Gcm).unwrap();
    let codec = NutCodec::new(&key, CipherSuite::Aes256Gcm).unwrap();

    for _ in 0..2_000 {
        let nut = codec.seal(&[0u8; PAYLOAD_SIZE]).unwrap();
        let mut raw = URL_SAFE_NO_PAD.decode(nut.as_str()).unwrap();

        let byte = rng.gen_range(NONCE_LEN..raw.len());
        raw[byte] ^= 1u8 << rng.gen_range(0..8u32);

        let result = codec.open(&URL_SAFE_NO_PAD.encode(&raw));
        assert!(matches!(result, Err(CoreError::AuthenticationFailed)));
    }
}

// ── expiry ──────────────────────────────────────────────────────────

#[test]
fn expiry_boundary_is_inclusive() {
    let clock = Arc::new(ManualClock::at(ISSUED_AT));
    let nutter = nutter_at(&clock, CipherSuite::ChaCha20Poly1305);
    let nut = nutter.issue("1.2.3.4").unwrap();

    clock.advance(nutter.expiry());
    assert_eq!(nutter.check(nut.as_str(), "1.2.3.4"), Validation::Valid);

    clock.advance(Duration::from_secs(1));
    assert_eq!(nutter.check(nut.as_str(), "1.2.3.4"), Validation::Expired);
}

// ── identity binding ────────────────────────────────────────────────

#[test]
fn identity_binding() {
    let clock = Arc::new(ManualClock::at(ISSUED_AT));
    let nutter = nutter_at(&clock, CipherSuite::Aes128Gcm);

    let bound = nutter.issue("1.2.3.4").unwrap();
    assert_eq!(nutter.check(bound.as_str(), "1.2.3.4"), Validation::Valid);
    assert_eq!(
        nutter.check(bound.as_str(), "5.6.7.8"),
        Validation::IdentityMismatch
    );

    let unbound = nutter.issue(&nutter.config().no_client_id).unwrap();
    assert_eq!(nutter.check(unbound.as_str(), "anything"), Validation::Valid);
}

// ── concurrency ─────────────────────────────────────────────────────

#[test]
fn concurrent_issuance_has_no_lost_updates() {
    const THREADS: usize = 16;
    const PER_THREAD: usize = 200;

    let clock = Arc::new(ManualClock::at(ISSUED_AT));
    let nutter = Arc::new(nutter_at(&clock, CipherSuite::ChaCha20Poly1305));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let nutter = Arc::clone(&nutter);
            thread::spawn(move || {
                (0..PER_THREAD)
                    .map(|_| nutter.issue("").unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let counters: HashSet<u32> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .map(|nut| nutter.validate(nut.as_str(), "").unwrap().counter)
        .collect();

    assert_eq!(counters.len(), THREADS * PER_THREAD);
    assert_eq!(counters.iter().max().copied(), Some((THREADS * PER_THREAD) as u32));
}

// ── cross-key rejection ─────────────────────────────────────────────

#[test]
fn nuts_do_not_validate_under_another_key() {
    let clock = Arc::new(ManualClock::at(ISSUED_AT));
    for suite in CipherSuite::ALL {
        let issuer = nutter_at(&clock, suite);
        let other = nutter_at(&clock, suite);

        let nut = issuer.issue("1.2.3.4").unwrap();
        assert_eq!(
            other.check(nut.as_str(), "1.2.3.4"),
            Validation::AuthenticationFailed
        );
    }
}
