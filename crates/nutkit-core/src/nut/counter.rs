// ============================================
// File: crates/nutkit-core/src/nut/counter.rs
// ============================================
//! # Issuance Counter
//!
//! Advisory 32-bit up-counter stamped into every nut. Each `Nutter` owns
//! its own counter, so independent services never share state.
//!
//! The counter resets on restart and wraps at 2^32. It is metadata, not a
//! replay defence; replay protection comes from the random AEAD nonce and
//! the expiry window.

use std::sync::atomic::{AtomicU32, Ordering};

/// Lock-free monotonically increasing issuance counter.
#[derive(Debug, Default)]
pub struct IssuanceCounter {
    value: AtomicU32,
}

impl IssuanceCounter {
    /// Creates a counter starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates a counter whose next value is `start + 1`.
    #[must_use]
    pub const fn starting_at(start: u32) -> Self {
        Self {
            value: AtomicU32::new(start),
        }
    }

    /// Atomically increments the counter and returns the new value.
    ///
    /// Wraps to zero after `u32::MAX`.
    pub fn next(&self) -> u32 {
        self.value.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    /// Returns the most recently issued value.
    #[must_use]
    pub fn current(&self) -> u32 {
        self.value.load(Ordering::Relaxed)
    }
}
