// ============================================
// File: crates/nutkit-server/src/lib.rs
// ============================================
//! # nutkit Server Library
//!
//! ## Creation Reason
//! Wires the nut engine and the store into a usable login-challenge
//! service, and provides what the `nutkit` binary needs to run it:
//! configuration, key files and errors.
//!
//! ## Main Functionality
//!
//! ### Modules
//! - [`config`]: Server configuration management
//! - [`keyfile`]: JSON nut key files
//! - [`services`]: Business logic services
//!   - [`services::challenge`]: Login exchange orchestration
//! - [`error`]: Server-specific error types
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        nutkit Server                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌─────────────┐     ┌─────────────┐     ┌─────────────────┐  │
//! │  │   Config    │────►│  Key File   │────►│     Nutter      │  │
//! │  │   (TOML)    │     │   (JSON)    │     │ (nutkit-core)   │  │
//! │  └─────────────┘     └─────────────┘     └────────┬────────┘  │
//! │                                                    │           │
//! │                      ┌─────────────────────────────▼────────┐  │
//! │                      │          ChallengeService            │  │
//! │                      └─────────────────────────────┬────────┘  │
//! │                                                    │           │
//! ├────────────────────────────────────────────────────┼───────────┤
//! │                     Store Layer                    ▼           │
//! │  ┌──────────────────────────────────────────────────────────┐ │
//! │  │   Store trait  /  InMemoryStore (nutkit-store)            │ │
//! │  └──────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Configuration changes require restart (no hot-reload)
//! - Never log nuts, keys or client identifiers
//!
//! ## Last Modified
//! v0.1.0 - Initial server library

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod keyfile;
pub mod services;

// Re-export primary types
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use keyfile::KeyFile;
pub use services::ChallengeService;
