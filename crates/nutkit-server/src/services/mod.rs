// ============================================
// File: crates/nutkit-server/src/services/mod.rs
// ============================================
//! # Server Services
//!
//! ## Creation Reason
//! Provides business logic services for the nutkit server, separated from
//! configuration and the command line.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`challenge`]: Login exchange orchestration over `Nutter` + `Store`
//!
//! ## ⚠️ Important Note for Next Developer
//! - Services are generic over `Store` so they can be tested with
//!   `InMemoryStore`
//! - Thread-safe by design (Send + Sync)
//!
//! ## Last Modified
//! v0.1.0 - Initial services structure

pub mod challenge;

// Re-export primary types
pub use challenge::ChallengeService;
