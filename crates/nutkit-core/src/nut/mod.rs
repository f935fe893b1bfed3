// ============================================
// File: crates/nutkit-core/src/nut/mod.rs
// ============================================
//! # Nut Module
//!
//! Payload layout, issuance counter and the [`Nutter`] service that ties
//! them to the codec.
//!
//! ## Submodules
//! - `payload`: Fixed 16-byte plaintext layout
//! - `counter`: Per-instance atomic issuance counter
//! - `validation`: Closed validation outcome
//! - `nutter`: Issue and validate

pub mod counter;
pub mod nutter;
pub mod payload;
pub mod validation;

pub use counter::IssuanceCounter;
pub use nutter::{Nutter, NutterConfig, DEFAULT_EXPIRY, DEFAULT_NO_CLIENT_ID};
pub use payload::{NutPayload, PAYLOAD_SIZE};
pub use validation::Validation;
