// ============================================
// File: crates/nutkit-common/src/lib.rs
// ============================================
//! # nutkit Common - Shared Utilities Library
//!
//! ## Creation Reason
//! Provides foundational types and utilities shared across all nutkit crates,
//! so the codec, the store and the server agree on what a nut, an identity
//! and a timestamp are.
//!
//! ## Main Functionality
//! - [`types`]: Identifier newtypes (`Nut`, `Identity`, `UserId`)
//! - [`time`]: Unix timestamps and the `Clock` abstraction
//! - [`error`]: Common error types and result aliases
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              nutkit-server                          │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                    │
//! │         ▼                     ▼                    │
//! │   nutkit-core           nutkit-store               │
//! │         │                     │                    │
//! │         └──────────┬──────────┘                    │
//! │                    ▼                               │
//! │             nutkit-common  ◄── You are here       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - This crate is the foundation - changes affect everything
//! - Keep dependencies minimal
//! - `Nut` is an opaque string everywhere outside nutkit-core
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod time;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{CommonError, Result};
pub use time::{Clock, ManualClock, SystemClock, Timestamp};
pub use types::{Identity, Nut, UserId};
