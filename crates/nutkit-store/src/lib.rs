// ============================================
// File: crates/nutkit-store/src/lib.rs
// ============================================
//! # nutkit Store - Persistence Layer
//!
//! ## Creation Reason
//! Holds the state a login exchange needs outside the stateless nuts:
//! transaction chains, completed idents, the user registry and the set of
//! consumed nuts.
//!
//! ## Main Functionality
//!
//! ### Modules
//! - [`traits`]: The async `Store` contract
//! - [`models`]: `Transaction`, `IdentToken`, `User`
//! - [`memory`]: `InMemoryStore` reference implementation
//! - [`error`]: Store-specific error types
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              nutkit-server                          │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                    │
//! │         ▼                     ▼                    │
//! │   nutkit-core           nutkit-store               │
//! │                        You are here ◄──            │
//! │         │                     │                    │
//! │         └──────────┬──────────┘                    │
//! │                    ▼                               │
//! │             nutkit-common                          │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Stores treat nuts as opaque keys; never decode them here
//! - Always program against the `Store` trait for testability
//!
//! ## Last Modified
//! v0.1.0 - Initial store layer implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod memory;
pub mod models;
pub mod traits;

// Re-export primary types
pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use models::{IdentToken, Transaction, User};
pub use traits::Store;
